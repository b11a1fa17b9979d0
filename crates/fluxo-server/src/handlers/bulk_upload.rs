//! Bulk-upload validation handler

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::Engine;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::{AppError, AppState, MAX_UPLOAD_SIZE};
use fluxo_core::{
    error_report_filename, error_report_workbook, parse_and_validate, TemplateType,
    ValidationError,
};

/// Accepted upload MIME types (xlsx, xls, csv).
const ACCEPTED_MIME_TYPES: [&str; 4] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "text/csv",
    "application/csv",
];

const ACCEPTED_TYPES_MESSAGE: &str = "Invalid file type. Accepted types: .xlsx, .xls, .csv";

/// Maximum number of errors returned inline in the JSON response; the full
/// list always goes into the downloadable report.
const ERROR_PREVIEW_LIMIT: usize = 10;

/// Maximum number of transformed rows returned as a preview.
const ROW_PREVIEW_LIMIT: usize = 5;

/// Error report attachment embedded in the response.
#[derive(Serialize)]
pub struct ErrorReport {
    pub filename: String,
    /// Base64-encoded xlsx workbook
    pub content: String,
}

/// Response for the validate endpoint
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub success: bool,
    pub is_valid: bool,
    pub total_records: usize,
    pub error_count: usize,
    pub errors: Vec<ValidationError>,
    pub has_more_errors: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_report: Option<ErrorReport>,
    pub preview: Vec<Map<String, Value>>,
}

/// POST /api/bulk-upload/validate - Validate an uploaded spreadsheet
///
/// Expects multipart form with:
/// - file: spreadsheet (required, xlsx/xls/csv, max 10MB)
/// - type: template identifier (required, one of transactions/categories/origins/banks)
pub async fn validate_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ValidateResponse>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut template_type: Option<String> = None;

    // Extract fields from multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                content_type = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::bad_request("Failed to read file data"))?;
                file_data = Some(bytes.to_vec());
            }
            "type" => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Failed to read type field"))?;
                if !value.trim().is_empty() {
                    template_type = Some(value);
                }
            }
            _ => {}
        }
    }

    // Request-shape checks run before any parsing
    let file_data = file_data.ok_or_else(|| AppError::bad_request("No file provided"))?;
    let template_type =
        template_type.ok_or_else(|| AppError::bad_request("Template type is required"))?;

    if !mime_allowed(content_type.as_deref(), filename.as_deref()) {
        return Err(AppError::bad_request(ACCEPTED_TYPES_MESSAGE));
    }
    if file_data.len() > MAX_UPLOAD_SIZE {
        return Err(AppError::bad_request("File size exceeds 10MB limit"));
    }

    validate_upload_core(&state, &file_data, filename.as_deref(), &template_type)
}

/// Core validation logic - separated from multipart form parsing for
/// testability.
///
/// Unknown template types and spreadsheet-codec failures propagate through
/// `?` and surface as a generic 500; they are unrecoverable for the request.
pub fn validate_upload_core(
    state: &AppState,
    data: &[u8],
    filename: Option<&str>,
    template_type: &str,
) -> Result<Json<ValidateResponse>, AppError> {
    let ty = TemplateType::parse(template_type)?;
    let result = parse_and_validate(data, ty, &state.catalog)?;

    info!(
        "Validated upload {:?} ({} bytes, type {}): {} rows, {} errors",
        filename.unwrap_or("<unnamed>"),
        data.len(),
        ty,
        result.total_records(),
        result.error_count()
    );

    let error_report = if result.errors.is_empty() {
        None
    } else {
        let workbook = error_report_workbook(&result.errors)?;
        Some(ErrorReport {
            filename: error_report_filename(
                filename.unwrap_or("upload"),
                chrono::Utc::now().date_naive(),
            ),
            content: base64::engine::general_purpose::STANDARD.encode(workbook),
        })
    };

    let has_more_errors = result.error_count() > ERROR_PREVIEW_LIMIT;
    let errors: Vec<ValidationError> = result
        .errors
        .iter()
        .take(ERROR_PREVIEW_LIMIT)
        .cloned()
        .collect();
    let preview: Vec<Map<String, Value>> = result
        .rows
        .iter()
        .take(ROW_PREVIEW_LIMIT)
        .map(|r| r.values.clone())
        .collect();

    Ok(Json(ValidateResponse {
        success: true,
        is_valid: result.is_valid,
        total_records: result.total_records(),
        error_count: result.error_count(),
        errors,
        has_more_errors,
        error_report,
        preview,
    }))
}

/// MIME check with an extension fallback for bare clients that omit the
/// part content type.
fn mime_allowed(content_type: Option<&str>, filename: Option<&str>) -> bool {
    if let Some(ct) = content_type {
        return ACCEPTED_MIME_TYPES.iter().any(|t| ct.eq_ignore_ascii_case(t));
    }
    if let Some(name) = filename {
        let lower = name.to_lowercase();
        return lower.ends_with(".xlsx") || lower.ends_with(".xls") || lower.ends_with(".csv");
    }
    false
}
