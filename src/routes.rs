use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use statement_ocr_to_table::{ExtractOptions, TableRow, extract_pdf_bytes_to_rows};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{MAX_UPLOAD_BYTES, MAX_UPLOAD_SLOTS, UPLOAD_FIELD_PREFIX, UploadedPdf};
use crate::render;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_form).post(index_upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn index_form() -> Html<String> {
    Html(render::render_page(&[], &[]))
}

async fn index_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let files = collect_uploads(multipart).await?;
    validate_batch(&files)?;

    let options = state.config.extract.clone();
    let (rows, errors) = tokio::task::spawn_blocking(move || process_batch(&files, &options))
        .await
        .map_err(|error| ApiError::Internal(format!("extraction task failed: {error}")))?;

    Ok(Html(render::render_page(&rows, &errors)).into_response())
}

async fn collect_uploads(mut multipart: Multipart) -> Result<Vec<UploadedPdf>, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if !name.starts_with(UPLOAD_FIELD_PREFIX) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        if file_name.is_empty() && bytes.is_empty() {
            // an optional file input left unselected still posts an empty part
            continue;
        }

        files.push(UploadedPdf {
            file_name,
            bytes: bytes.to_vec(),
        });
    }
    Ok(files)
}

/// Rejects the whole batch before any extraction runs: at most three files,
/// every file name ending in `.pdf` case-insensitively.
pub fn validate_batch(files: &[UploadedPdf]) -> Result<(), ApiError> {
    if files.len() > MAX_UPLOAD_SLOTS {
        return Err(ApiError::Validation(format!(
            "please upload a maximum of {MAX_UPLOAD_SLOTS} PDF files"
        )));
    }

    for file in files {
        if !is_valid_pdf_name(&file.file_name) {
            return Err(ApiError::Validation(format!(
                "'{}' is not a PDF file; only .pdf uploads are accepted",
                file.file_name
            )));
        }
    }

    Ok(())
}

#[must_use]
pub fn is_valid_pdf_name(name: &str) -> bool {
    !name.is_empty() && name.to_ascii_lowercase().ends_with(".pdf")
}

/// Extracts each file in slot order. A failing slot contributes an error
/// message instead of aborting the batch, so surviving slots still render.
pub fn process_batch(
    files: &[UploadedPdf],
    options: &ExtractOptions,
) -> (Vec<TableRow>, Vec<String>) {
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for file in files {
        match extract_pdf_bytes_to_rows(&file.bytes, options) {
            Ok((file_rows, report)) => {
                tracing::info!(
                    file = %file.file_name,
                    pages = report.page_count,
                    rows = report.row_count,
                    skipped = report.non_matching_lines,
                    "statement processed"
                );
                rows.extend(file_rows);
            }
            Err(error) => {
                tracing::warn!(file = %file.file_name, %error, "statement processing failed");
                errors.push(format!("{}: {error}", file.file_name));
            }
        }
    }

    (rows, errors)
}
