//! Workbook generation and report naming
//!
//! Two pure transforms over already-computed results: the downloadable
//! error-report workbook and the per-type import template workbook. No
//! validation logic lives here.

use std::path::Path;

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::models::ValidationError;
use crate::templates::{Template, TemplateType};

/// Header row of the error-report sheet, matching the JSON error fields.
pub const ERROR_REPORT_HEADER: [&str; 5] =
    ["Row", "Column", "Current Value", "Error", "Suggestion"];

/// Build the import template workbook for one type: a single sheet whose
/// header row is the template's column names.
pub fn template_workbook(template: &Template) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, spec) in template.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, spec.name, &bold)?;
        worksheet.set_column_width(col as u16, column_width(spec.name))?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Build the downloadable error-report workbook: one row per validation
/// error, in the same order as the error sequence.
pub fn error_report_workbook(errors: &[ValidationError]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, name) in ERROR_REPORT_HEADER.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &bold)?;
        worksheet.set_column_width(col as u16, column_width(name))?;
    }

    for (i, error) in errors.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_number(row, 0, error.row as f64)?;
        worksheet.write_string(row, 1, &error.column)?;
        worksheet.write_string(row, 2, &error.value)?;
        worksheet.write_string(row, 3, &error.message)?;
        worksheet.write_string(row, 4, error.suggestion.as_deref().unwrap_or(""))?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// `<type>_template_<YYYY-MM-DD>.xlsx`
pub fn template_filename(template_type: TemplateType, date: NaiveDate) -> String {
    format!(
        "{}_template_{}.xlsx",
        template_type.as_str(),
        date.format("%Y-%m-%d")
    )
}

/// `<original-basename>_errors_<YYYY-MM-DD>.xlsx`
pub fn error_report_filename(original_name: &str, date: NaiveDate) -> String {
    let basename = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    format!("{}_errors_{}.xlsx", basename, date.format("%Y-%m-%d"))
}

fn column_width(name: &str) -> f64 {
    (name.len() as f64 * 1.5).max(12.0)
}
