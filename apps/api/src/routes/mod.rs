pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Generated PDFs are also reachable directly; pdfUrl values resolve here.
    let generated = ServeDir::new(&state.config.generated_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/resumes",
            post(handlers::handle_create).get(handlers::handle_list),
        )
        .route(
            "/api/resumes/:id",
            get(handlers::handle_get)
                .put(handlers::handle_update)
                .delete(handlers::handle_delete),
        )
        .route("/api/resumes/:id/pdf", get(handlers::handle_download_pdf))
        .route("/api/resumes/:id/email", post(handlers::handle_resend_email))
        .nest_service("/generated", generated)
        .with_state(state)
}
