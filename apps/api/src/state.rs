use sqlx::PgPool;

use crate::config::Config;
use crate::email::Mailer;
use crate::render::PdfRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The renderer and mailer are constructed once at startup and reused for the
/// process lifetime.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub renderer: PdfRenderer,
    pub mailer: Mailer,
    pub config: Config,
}
