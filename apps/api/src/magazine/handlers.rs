//! Axum route handlers for the Biography API.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::magazine::assembler::{AssembledDocument, DocumentRequest};
use crate::magazine::generator::{generate_document, preview_document};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request parsing
// ────────────────────────────────────────────────────────────────────────────

/// Parses the raw body, then validates the `chapters` field before
/// deserializing, so an absent, empty, or non-list value is reported as such
/// rather than as a serde error. Every failure is `InvalidInput`.
fn parse_request(body: &[u8]) -> Result<DocumentRequest, AppError> {
    let body: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidInput(format!("Malformed request: {e}")))?;

    match body.get("chapters") {
        None | Some(Value::Null) => {
            return Err(AppError::InvalidInput("No chapters provided".to_string()))
        }
        Some(Value::Array(items)) if items.is_empty() => {
            return Err(AppError::InvalidInput("No chapters provided".to_string()))
        }
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(AppError::InvalidInput(
                "chapters must be a list".to_string(),
            ))
        }
    }

    serde_json::from_value(body)
        .map_err(|e| AppError::InvalidInput(format!("Malformed request: {e}")))
}

/// `family_biography_{title}.{ext}` with the title lower-cased, spaces turned
/// into underscores, and anything else outside `[a-z0-9_-]` dropped.
fn attachment_filename(title: &str, extension: &str) -> String {
    let stem: String = title
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    format!("family_biography_{stem}.{extension}")
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/biography/pdf
///
/// Runs the full pipeline and returns the rendered document as an attachment
/// (PDF with an external renderer configured, HTML otherwise).
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request = parse_request(&body)?;
    let filename = attachment_filename(&request.title, state.renderer.file_extension());

    let generated = generate_document(&state, request).await?;
    info!(
        "Exporting {filename} ({} unique photos)",
        generated.unique_photos_used
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(generated.media_type),
    );
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid attachment header: {e}")))?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok((headers, generated.bytes))
}

/// POST /api/v1/biography/layout
///
/// Same request as the export endpoint. Returns the assembled document
/// description as JSON without rendering.
pub async fn handle_preview_layout(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AssembledDocument>, AppError> {
    let request = parse_request(&body)?;
    let assembled = preview_document(&state, request).await?;
    Ok(Json(assembled))
}
