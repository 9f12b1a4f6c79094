//! Request handlers for the résumé API.
//!
//! Each handler is one pass of control flow: validate → store → optionally
//! render → optionally notify → respond. Render and notify are best-effort
//! side effects; their failures degrade the response payload (`pdfUrl` null,
//! `emailSent` false) instead of aborting the primary operation. Store
//! failures are the only fatal class.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::payload::{split_roles, ResumePayload};
use crate::resumes::store;
use crate::state::AppState;

/// POST /api/resumes
///
/// The render runs before the insert; a render failure leaves `pdf_filename`
/// unset and skips the email. The notify outcome is reported back as the
/// `emailSent` flag, never as an error.
pub async fn handle_create(
    State(state): State<AppState>,
    Json(payload): Json<ResumePayload>,
) -> Result<impl IntoResponse, AppError> {
    let record = payload.to_record().map_err(AppError::Validation)?;

    let pdf_filename = match state.renderer.render(&payload.template_data()).await {
        Ok(filename) => Some(filename),
        Err(e) => {
            error!("Failed to generate PDF, continuing without it: {e}");
            None
        }
    };

    let row = store::create(&state.db, &record, pdf_filename.as_deref()).await?;
    info!("Created resume {}", row.id);

    let mut email_sent = false;
    if let Some(filename) = &pdf_filename {
        email_sent = state
            .mailer
            .send_resume_pdf(&row.email, &row.first_name, &row.last_name, filename)
            .await;
        info!(
            "Email status for resume {}: {}",
            row.id,
            if email_sent { "sent" } else { "failed" }
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": row.id,
            "message": "Resume created successfully",
            "data": &row,
            "pdfUrl": pdf_filename.as_deref().map(pdf_url),
            "emailSent": email_sent,
        })),
    ))
}

/// GET /api/resumes
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let rows = store::find_all(&state.db).await?;
    info!("Fetched {} resumes", rows.len());
    Ok(Json(rows.iter().map(expand_row).collect()))
}

/// GET /api/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let row = store::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(expand_row(&row)))
}

/// GET /api/resumes/:id/pdf
///
/// If no PDF has been generated yet, one is synthesized on demand from the
/// stored columns and its filename persisted. A recorded filename whose file
/// is missing from disk is a 404, not a repair.
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = store::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    let filename = match &row.pdf_filename {
        Some(filename) => filename.clone(),
        None => {
            info!("No PDF recorded for resume {id}, generating on demand");
            let payload = ResumePayload::from_row(&row);
            let filename = state.renderer.render(&payload.template_data()).await?;
            store::set_pdf_filename(&state.db, id, &filename).await?;
            filename
        }
    };

    let path = state.config.generated_dir.join(&filename);
    if !path.exists() {
        return Err(AppError::NotFound("PDF file not found".to_string()));
    }
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read {filename}: {e}")))?;

    let download_name = download_name(&row.first_name, &row.last_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{download_name}\""),
            ),
        ],
        bytes,
    ))
}

/// POST /api/resumes/:id/email
///
/// Unlike Download, this never generates a PDF: a résumé without one is a 404.
pub async fn handle_resend_email(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let row = store::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    let filename = row
        .pdf_filename
        .clone()
        .ok_or_else(|| AppError::NotFound("PDF not generated for this resume".to_string()))?;

    let sent = state
        .mailer
        .send_resume_pdf(&row.email, &row.first_name, &row.last_name, &filename)
        .await;

    if sent {
        Ok(Json(json!({
            "message": "Resume PDF sent successfully to your email"
        })))
    } else {
        Err(AppError::Email(
            "Failed to send resume PDF via email".to_string(),
        ))
    }
}

/// PUT /api/resumes/:id
///
/// Full replace of every field, then an unconditional re-render and re-send.
/// Render/email failures are logged; the response is still 200 with whatever
/// `pdfUrl` resulted.
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResumePayload>,
) -> Result<Json<Value>, AppError> {
    let record = payload
        .to_record()
        .map_err(|msg| AppError::Internal(anyhow::anyhow!(msg)))?;

    let updated = store::update(&state.db, id, &record)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    info!("Updated resume {id}");

    let mut new_pdf_url = None;
    match state.renderer.render(&payload.template_data()).await {
        Ok(filename) => {
            if let Err(e) = store::set_pdf_filename(&state.db, id, &filename).await {
                error!("Failed to record new PDF filename for resume {id}: {e}");
            }
            let sent = state
                .mailer
                .send_resume_pdf(
                    &updated.email,
                    &updated.first_name,
                    &updated.last_name,
                    &filename,
                )
                .await;
            info!(
                "Updated resume email status for {id}: {}",
                if sent { "sent" } else { "failed" }
            );
            new_pdf_url = Some(pdf_url(&filename));
        }
        Err(e) => error!("Failed to generate updated PDF for resume {id}: {e}"),
    }

    Ok(Json(json!({
        "message": "Resume updated successfully",
        "data": &updated,
        "pdfUrl": new_pdf_url,
    })))
}

/// DELETE /api/resumes/:id
///
/// Removes the generated PDF first (best-effort), then the record.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let row = store::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    if let Some(filename) = &row.pdf_filename {
        let path = state.config.generated_dir.join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!("Deleted PDF file {filename}"),
            Err(e) => warn!("Could not delete PDF file {filename}: {e}"),
        }
    }

    store::delete(&state.db, id).await?;
    info!("Deleted resume {id}");

    Ok(Json(json!({ "message": "Resume deleted successfully" })))
}

// ────────────────────────────────────────────────────────────────────────────
// Response shaping
// ────────────────────────────────────────────────────────────────────────────

/// Derived download path for a generated filename. Not persisted.
fn pdf_url(filename: &str) -> String {
    format!("/generated/{filename}")
}

fn download_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name}_{last_name}_Resume.pdf")
}

/// The read shape: every stored column plus the JSON sections under their
/// wire names, `desiredRoles` split back into a list, and the derived
/// `pdfUrl`.
fn expand_row(row: &ResumeRow) -> Value {
    let mut value = serde_json::to_value(row).unwrap_or_else(|_| json!({}));
    if let Some(map) = value.as_object_mut() {
        map.insert("education".to_string(), section_or(&row.education_json, json!([])));
        map.insert("skills".to_string(), section_or(&row.skills_json, json!({})));
        map.insert(
            "experience".to_string(),
            section_or(&row.experience_json, json!([])),
        );
        map.insert(
            "projects".to_string(),
            section_or(&row.projects_json, json!([])),
        );
        map.insert(
            "extraCurricular".to_string(),
            section_or(&row.extra_curricular_json, Value::Null),
        );
        map.insert(
            "leadership".to_string(),
            section_or(&row.leadership_json, Value::Null),
        );
        map.insert(
            "desiredRoles".to_string(),
            json!(split_roles(row.desired_roles.as_deref())),
        );
        map.insert(
            "pdfUrl".to_string(),
            match &row.pdf_filename {
                Some(filename) => Value::String(pdf_url(filename)),
                None => Value::Null,
            },
        );
    }
    value
}

fn section_or(stored: &Option<Value>, default: Value) -> Value {
    match stored {
        Some(v) if !v.is_null() => v.clone(),
        _ => default,
    }
}
