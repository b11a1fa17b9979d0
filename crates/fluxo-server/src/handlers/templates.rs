//! Template download handler

use axum::{
    body::Body,
    extract::Path,
    http::{header, Response, StatusCode},
};
use tracing::info;

use crate::AppError;
use fluxo_core::{template_filename, template_workbook, Template, TemplateType};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// GET /api/bulk-upload/template/:type - Download an import template
pub async fn download_template(
    Path(template_type): Path<String>,
) -> Result<Response<Body>, AppError> {
    let ty = TemplateType::parse(&template_type)
        .map_err(|e| AppError::bad_request(&e.to_string()))?;

    let template = Template::for_type(ty);
    let buffer = template_workbook(&template)?;
    let filename = template_filename(ty, chrono::Utc::now().date_naive());

    info!("Generated {} template ({} bytes)", ty, buffer.len());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, XLSX_CONTENT_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(buffer))
        .map_err(|e| AppError::internal(&e.to_string()))
}
