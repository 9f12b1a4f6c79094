//! PDF document rendering.
//!
//! Fills the résumé HTML template with submitted data, then rasterizes the
//! result with a headless Chromium instance. Every call writes a distinct
//! `resume_<uuid>.pdf` under the generated dir so concurrent renders never
//! race on a filename. The browser process and intermediate HTML file are
//! released on every exit path when their handles drop.

mod helpers;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use handlebars::Handlebars;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use serde_json::Value;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

const TEMPLATE_NAME: &str = "resume";
const RESUME_TEMPLATE: &str = include_str!("../../resources/resume-template.html");

// A4 in inches, with margins matching the template's 20px at 96dpi.
const PAPER_WIDTH_IN: f64 = 8.27;
const PAPER_HEIGHT_IN: f64 = 11.69;
const MARGIN_IN: f64 = 0.21;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid resume template: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("template rendering failed: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("browser engine error: {0}")]
    Browser(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render task did not complete")]
    TaskFailed,
}

/// Renders résumé data to PDF files on disk.
///
/// The template registry is compiled once at construction and shared across
/// requests; each render spawns its own browser instance.
#[derive(Clone)]
pub struct PdfRenderer {
    registry: Arc<Handlebars<'static>>,
    generated_dir: PathBuf,
}

impl PdfRenderer {
    pub fn new(generated_dir: PathBuf) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(TEMPLATE_NAME, RESUME_TEMPLATE)?;
        helpers::register(&mut registry);

        std::fs::create_dir_all(&generated_dir)?;

        Ok(Self {
            registry: Arc::new(registry),
            generated_dir,
        })
    }

    /// Fills the template with `data` and rasterizes it to a freshly named
    /// PDF under the generated dir. Returns the generated filename.
    pub async fn render(&self, data: &Value) -> Result<String, RenderError> {
        let html = self.registry.render(TEMPLATE_NAME, data)?;
        let dir = self.generated_dir.clone();

        let filename = tokio::task::spawn_blocking(move || rasterize(&html, &dir))
            .await
            .map_err(|_| RenderError::TaskFailed)??;

        info!("PDF generated successfully: {filename}");
        Ok(filename)
    }
}

/// Drives the headless browser. Blocking; runs on the blocking pool.
fn rasterize(html: &str, generated_dir: &Path) -> Result<String, RenderError> {
    let page = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(".html")
        .tempfile()?;
    std::fs::write(page.path(), html)?;

    let options = LaunchOptions::default_builder()
        .sandbox(false)
        .build()
        .map_err(|e| RenderError::Browser(e.to_string()))?;
    let browser = Browser::new(options).map_err(|e| RenderError::Browser(e.to_string()))?;
    let tab = browser
        .new_tab()
        .map_err(|e| RenderError::Browser(e.to_string()))?;

    tab.navigate_to(&format!("file://{}", page.path().display()))
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| RenderError::Browser(e.to_string()))?;

    let pdf = tab
        .print_to_pdf(Some(pdf_options()))
        .map_err(|e| RenderError::Browser(e.to_string()))?;

    let filename = format!("resume_{}.pdf", Uuid::new_v4());
    std::fs::write(generated_dir.join(&filename), pdf)?;

    Ok(filename)
}

fn pdf_options() -> PrintToPdfOptions {
    PrintToPdfOptions {
        print_background: Some(true),
        prefer_css_page_size: Some(true),
        paper_width: Some(PAPER_WIDTH_IN),
        paper_height: Some(PAPER_HEIGHT_IN),
        margin_top: Some(MARGIN_IN),
        margin_bottom: Some(MARGIN_IN),
        margin_left: Some(MARGIN_IN),
        margin_right: Some(MARGIN_IN),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_compiles_and_renders_minimal_data() {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, RESUME_TEMPLATE)
            .unwrap();
        helpers::register(&mut registry);

        let html = registry
            .render(
                TEMPLATE_NAME,
                &json!({
                    "personalDetails": {
                        "fullName": "Ada Lovelace",
                        "firstName": "Ada",
                        "lastName": "Lovelace",
                        "email": "ada@x.com"
                    },
                    "objective": { "summary": "Engineer" },
                    "education": [],
                    "skills": { "technical": [] },
                    "experience": [],
                    "projects": []
                }),
            )
            .unwrap();

        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("Engineer"));
        // Empty sections are omitted entirely, not rendered blank.
        assert!(!html.contains("Experience</h2>"));
        assert!(!html.contains("Projects</h2>"));
    }

    #[test]
    fn test_template_renders_conditional_sections_when_present() {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, RESUME_TEMPLATE)
            .unwrap();
        helpers::register(&mut registry);

        let html = registry
            .render(
                TEMPLATE_NAME,
                &json!({
                    "personalDetails": { "fullName": "Grace Hopper", "email": "g@h.io" },
                    "objective": {
                        "summary": "Build compilers",
                        "desiredRoles": ["Backend", "Compilers"]
                    },
                    "experience": [{
                        "jobTitle": "Rear Admiral",
                        "company": "US Navy",
                        "startDate": "1943-12-01",
                        "endDate": "Present",
                        "achievements": "Wrote the first compiler"
                    }],
                    "skills": { "technical": ["COBOL", "FLOW-MATIC"] }
                }),
            )
            .unwrap();

        assert!(html.contains("Rear Admiral"));
        assert!(html.contains("December 1943"));
        assert!(html.contains("Present"));
        assert!(html.contains("Backend, Compilers"));
        assert!(html.contains("COBOL, FLOW-MATIC"));
    }

    #[test]
    fn test_pdf_options_request_a4_with_background() {
        let options = pdf_options();
        assert_eq!(options.print_background, Some(true));
        assert_eq!(options.paper_width, Some(PAPER_WIDTH_IN));
        assert_eq!(options.paper_height, Some(PAPER_HEIGHT_IN));
    }

    #[test]
    fn test_generated_filenames_are_unique() {
        let a = format!("resume_{}.pdf", Uuid::new_v4());
        let b = format!("resume_{}.pdf", Uuid::new_v4());
        assert_ne!(a, b);
    }
}
