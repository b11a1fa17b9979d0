//! Data model types shared across the validation pipeline

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single spreadsheet cell exactly as decoded, before any normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Text form used in error messages and reports.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// One decoded spreadsheet row, keyed by header text.
///
/// `number` is the 1-based position in the source sheet; the header occupies
/// row 1, so the first data row is row 2. Raw rows are never mutated after
/// decode; transformation always works on a copy of the cell values.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub number: usize,
    pub cells: HashMap<String, CellValue>,
}

impl RawRow {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            cells: HashMap::new(),
        }
    }

    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&CellValue::Empty)
    }
}

/// Transaction direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flow {
    #[serde(rename = "ENTRADA")]
    Entrada,
    #[serde(rename = "SAIDA")]
    Saida,
}

impl Flow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::Entrada => "ENTRADA",
            Flow::Saida => "SAIDA",
        }
    }

    /// Case-insensitive parse of the canonical values.
    pub fn parse(s: &str) -> Option<Flow> {
        match s.trim().to_uppercase().as_str() {
            "ENTRADA" => Some(Flow::Entrada),
            "SAIDA" => Some(Flow::Saida),
            _ => None,
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of normalization applied to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Date,
    Amount,
    FlowInferred,
    TitleCase,
    Trim,
}

/// Record of one normalization that changed a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformLogEntry {
    pub column: String,
    pub kind: TransformKind,
    pub before: String,
    pub after: String,
}

/// A keyword-derived category guess attached to a transformed row.
///
/// Distinct from a validation error: suggestions are non-binding and the
/// reasoning always names the keyword that matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub column: String,
    pub value: String,
    pub reasoning: String,
}

/// A single field-level validation problem.
///
/// `row` is the 1-based spreadsheet row (header row is row 1). Errors are
/// collected in row-then-column discovery order and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    pub row: usize,
    pub column: String,
    pub value: String,
    #[serde(rename = "error")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// One normalized row plus the annotations produced while transforming it.
///
/// `values` holds the normalized scalars in template column order: ISO date
/// strings, numeric amounts, canonical flow values, trimmed text. Cells that
/// failed validation keep their original display text so previews show what
/// was uploaded.
#[derive(Debug, Clone, Serialize)]
pub struct TransformedRow {
    pub row: usize,
    pub values: Map<String, Value>,
    pub log: Vec<TransformLogEntry>,
    pub suggestions: Vec<Suggestion>,
}

impl TransformedRow {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            values: Map::new(),
            log: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}

/// Aggregate outcome of one pipeline invocation.
///
/// Owns its rows and errors exclusively; there is no cross-invocation state.
#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub rows: Vec<TransformedRow>,
    pub errors: Vec<ValidationError>,
    pub is_valid: bool,
}

impl ValidationResult {
    pub fn new(rows: Vec<TransformedRow>, errors: Vec<ValidationError>) -> Self {
        let is_valid = errors.is_empty();
        Self {
            rows,
            errors,
            is_valid,
        }
    }

    pub fn total_records(&self) -> usize {
        self.rows.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
