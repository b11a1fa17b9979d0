//! Fluxo Core Library
//!
//! Shared functionality for the Fluxo bulk-import tool:
//! - Template registry for the four supported import schemas
//! - Spreadsheet reader for xlsx/xls/csv uploads
//! - Row transformer and validator (dates, amounts, flow, text)
//! - Merchant-keyword category prediction
//! - Error-report and template workbook generation
//! - Pipeline orchestrator tying the stages together

pub mod categories;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod templates;
pub mod transform;

pub use categories::{CategoryGuess, KeywordCatalog};
pub use error::{Error, Result};
pub use models::{
    CellValue, Flow, RawRow, Suggestion, TransformKind, TransformLogEntry, TransformedRow,
    ValidationError, ValidationResult,
};
pub use pipeline::parse_and_validate;
pub use reader::read_rows;
pub use report::{
    error_report_filename, error_report_workbook, template_filename, template_workbook,
};
pub use templates::{ColumnSpec, Template, TemplateType, ValueKind};
pub use transform::{normalize_amount, normalize_date, transform_row};
