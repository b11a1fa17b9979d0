//! Pipeline orchestrator
//!
//! Straight-line flow: decode the uploaded binary, look up the template,
//! transform and validate every row in original order, aggregate. Every row
//! is evaluated even when earlier rows failed; only a decode failure aborts
//! the whole file.

use tracing::info;

use crate::categories::KeywordCatalog;
use crate::error::Result;
use crate::models::ValidationResult;
use crate::reader::read_rows;
use crate::templates::{Template, TemplateType};
use crate::transform::transform_row;

/// Parse and validate one uploaded spreadsheet.
///
/// The catalog is read-only shared configuration; each invocation owns its
/// result exclusively.
pub fn parse_and_validate(
    data: &[u8],
    template_type: TemplateType,
    catalog: &KeywordCatalog,
) -> Result<ValidationResult> {
    let template = Template::for_type(template_type);
    let raw_rows = read_rows(data)?;

    let mut rows = Vec::with_capacity(raw_rows.len());
    let mut errors = Vec::new();
    for raw in &raw_rows {
        let (row, row_errors) = transform_row(&template, raw, catalog);
        rows.push(row);
        errors.extend(row_errors);
    }

    let result = ValidationResult::new(rows, errors);
    info!(
        "Validated {} {} rows: {} errors",
        result.total_records(),
        template_type,
        result.error_count()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entirely_empty_rows_are_skipped() {
        let csv = "Name\n\
                   Santander\n\
                   ,\n\
                   Millennium\n";
        let catalog = KeywordCatalog::builtin();
        let result = parse_and_validate(csv.as_bytes(), TemplateType::Banks, &catalog).unwrap();
        // The blank middle row is entirely empty and skipped by the reader,
        // so only the named rows count.
        assert_eq!(result.total_records(), 2);
        assert!(result.is_valid);
    }

    #[test]
    fn test_errors_preserve_row_order() {
        // Stray data in an unused column keeps the blank-Name rows alive
        let csv = "Name,Notes\n\
                   ,pending\n\
                   Santander,\n\
                   ,pending\n";
        let catalog = KeywordCatalog::builtin();
        let result = parse_and_validate(csv.as_bytes(), TemplateType::Banks, &catalog).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.errors[0].row, 2);
        assert_eq!(result.errors[1].row, 4);
        assert_eq!(result.errors[0].message, "Name is required");
    }
}
