//! Row transformation and validation
//!
//! Converts one raw row into one transformed row plus its validation errors
//! and suggestions, for a given template. Rows are independent; nothing
//! here depends on the outcome of another row.

use chrono::NaiveDate;
use serde_json::Value;

use crate::categories::KeywordCatalog;
use crate::models::{
    CellValue, Flow, RawRow, Suggestion, TransformKind, TransformLogEntry, TransformedRow,
    ValidationError,
};
use crate::templates::{columns, Template, TemplateType, ValueKind};

/// Date formats accepted by the normalizer, tried in order. Day-first is
/// authoritative for every slash/dash form: `1/5/2024` is May 1st.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Normalize a date string to ISO `YYYY-MM-DD`.
///
/// Already-ISO input comes back unchanged. Returns `None` when no supported
/// format matches; the caller reports that as a validation error rather
/// than defaulting.
pub fn normalize_date(raw: &str) -> Option<String> {
    let s = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    None
}

/// Normalize an amount string to a float, detecting whether separators are
/// European (comma-decimal) or US (comma-thousands) from their position:
///
/// - with both separators present, the later one is the decimal mark;
/// - a single comma not followed by a 3-digit group is a decimal mark,
///   otherwise commas separate thousands;
/// - a single period followed by a 3-digit group separates thousands,
///   otherwise it is a decimal mark.
///
/// Currency symbols and spaces are stripped; parentheses and a leading
/// minus mean negative. Returns `None` for non-numeric residue.
pub fn normalize_amount(raw: &str) -> Option<f64> {
    let mut s: String = raw
        .trim()
        .replace(['€', '$', ' ', '\u{a0}'], "");
    if s.is_empty() {
        return None;
    }

    let mut negative = false;
    if s.starts_with('(') && s.ends_with(')') && s.len() > 2 {
        negative = true;
        s = s[1..s.len() - 1].to_string();
    }
    if let Some(stripped) = s.strip_prefix('-') {
        negative = true;
        s = stripped.to_string();
    }

    let has_comma = s.contains(',');
    let has_period = s.contains('.');
    let cleaned = if has_comma && has_period {
        if s.rfind(',') > s.rfind('.') {
            // European: periods group thousands, comma marks decimals
            s.replace('.', "").replace(',', ".")
        } else {
            // US: commas group thousands, period marks decimals
            s.replace(',', "")
        }
    } else if has_comma {
        if comma_is_decimal(&s) {
            s.replace(',', ".")
        } else {
            s.replace(',', "")
        }
    } else if has_period {
        if period_is_thousands(&s) {
            s.replace('.', "")
        } else {
            s
        }
    } else {
        s
    };

    if cleaned.is_empty()
        || !cleaned.chars().any(|c| c.is_ascii_digit())
        || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.')
        || cleaned.matches('.').count() > 1
    {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

fn comma_is_decimal(s: &str) -> bool {
    if s.matches(',').count() != 1 {
        return false;
    }
    let after = &s[s.rfind(',').unwrap() + 1..];
    // "1,234" reads as a thousands group; anything else marks decimals
    !(after.len() == 3 && after.chars().all(|c| c.is_ascii_digit()))
}

fn period_is_thousands(s: &str) -> bool {
    if s.matches('.').count() != 1 {
        return true;
    }
    let after = &s[s.rfind('.').unwrap() + 1..];
    after.len() == 3 && after.chars().all(|c| c.is_ascii_digit())
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

fn value_is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Transform and validate one raw row against a template.
///
/// Normalization runs first, in template column order; flow inference and
/// category prediction follow; required-field checks run last so inferred
/// and predicted values count as present.
pub fn transform_row(
    template: &Template,
    raw: &RawRow,
    catalog: &KeywordCatalog,
) -> (TransformedRow, Vec<ValidationError>) {
    let mut out = TransformedRow::new(raw.number);
    let mut errors = Vec::new();

    for spec in template.columns {
        let cell = raw.get(spec.name);
        if cell.is_empty() {
            out.values.insert(spec.name.to_string(), Value::Null);
            continue;
        }

        match spec.kind {
            ValueKind::Date => normalize_date_cell(&mut out, &mut errors, raw, spec.name, cell),
            ValueKind::Amount => normalize_amount_cell(&mut out, &mut errors, raw, spec.name, cell),
            ValueKind::Flow => normalize_flow_cell(&mut out, &mut errors, raw, spec.name, cell),
            ValueKind::Text => normalize_text_cell(&mut out, spec.name, cell, catalog),
        }
    }

    if template.template_type == TemplateType::Transactions {
        infer_flow(&mut out, raw);
        predict_categories(&mut out, catalog);
    }

    for spec in template.columns.iter().filter(|c| c.required) {
        if value_is_blank(out.values.get(spec.name)) {
            errors.push(ValidationError {
                row: raw.number,
                column: spec.name.to_string(),
                value: raw.get(spec.name).display(),
                message: format!("{} is required", spec.name),
                suggestion: None,
            });
        }
    }

    if template.template_type == TemplateType::Transactions
        && raw.get(columns::OUTGOING_AMOUNT).is_empty()
        && raw.get(columns::INCOME_AMOUNT).is_empty()
    {
        errors.push(ValidationError {
            row: raw.number,
            column: columns::OUTGOING_AMOUNT.to_string(),
            value: String::new(),
            message: "Outgoing Amount or Income Amount is required".to_string(),
            suggestion: None,
        });
    }

    (out, errors)
}

fn normalize_date_cell(
    out: &mut TransformedRow,
    errors: &mut Vec<ValidationError>,
    raw: &RawRow,
    column: &str,
    cell: &CellValue,
) {
    let text = cell.display();
    match normalize_date(&text) {
        Some(iso) => {
            if iso != text.trim() {
                out.log.push(TransformLogEntry {
                    column: column.to_string(),
                    kind: TransformKind::Date,
                    before: text,
                    after: iso.clone(),
                });
            }
            out.values.insert(column.to_string(), Value::String(iso));
        }
        None => {
            errors.push(ValidationError {
                row: raw.number,
                column: column.to_string(),
                value: text.clone(),
                message: "Invalid date format".to_string(),
                suggestion: Some("Use YYYY-MM-DD or DD/MM/YYYY".to_string()),
            });
            out.values.insert(column.to_string(), Value::String(text));
        }
    }
}

fn normalize_amount_cell(
    out: &mut TransformedRow,
    errors: &mut Vec<ValidationError>,
    raw: &RawRow,
    column: &str,
    cell: &CellValue,
) {
    if let CellValue::Number(n) = cell {
        out.values.insert(column.to_string(), json_number(*n));
        return;
    }

    let text = cell.display();
    match normalize_amount(&text) {
        Some(value) => {
            let canonical = format_amount(value);
            if text.trim() != canonical {
                out.log.push(TransformLogEntry {
                    column: column.to_string(),
                    kind: TransformKind::Amount,
                    before: text,
                    after: canonical,
                });
            }
            out.values.insert(column.to_string(), json_number(value));
        }
        None => {
            errors.push(ValidationError {
                row: raw.number,
                column: column.to_string(),
                value: text.clone(),
                message: "Invalid amount".to_string(),
                suggestion: Some("Use a plain number such as 1234.56 or 1.234,56".to_string()),
            });
            out.values.insert(column.to_string(), Value::String(text));
        }
    }
}

fn normalize_flow_cell(
    out: &mut TransformedRow,
    errors: &mut Vec<ValidationError>,
    raw: &RawRow,
    column: &str,
    cell: &CellValue,
) {
    let text = cell.display();
    match Flow::parse(&text) {
        Some(flow) => {
            if text.trim() != flow.as_str() {
                out.log.push(TransformLogEntry {
                    column: column.to_string(),
                    kind: TransformKind::Trim,
                    before: text,
                    after: flow.as_str().to_string(),
                });
            }
            out.values
                .insert(column.to_string(), Value::String(flow.as_str().to_string()));
        }
        None => {
            errors.push(ValidationError {
                row: raw.number,
                column: column.to_string(),
                value: text.clone(),
                message: "Flow must be ENTRADA or SAIDA".to_string(),
                suggestion: Some("Use ENTRADA or SAIDA".to_string()),
            });
            out.values.insert(column.to_string(), Value::String(text));
        }
    }
}

fn normalize_text_cell(
    out: &mut TransformedRow,
    column: &str,
    cell: &CellValue,
    catalog: &KeywordCatalog,
) {
    let text = cell.display();
    if column == columns::ORIGIN {
        let canonical = catalog.canonical_origin(&text);
        if canonical != text {
            out.log.push(TransformLogEntry {
                column: column.to_string(),
                kind: TransformKind::TitleCase,
                before: text,
                after: canonical.clone(),
            });
        }
        out.values.insert(column.to_string(), Value::String(canonical));
        return;
    }

    let trimmed = text.trim().to_string();
    if trimmed != text {
        out.log.push(TransformLogEntry {
            column: column.to_string(),
            kind: TransformKind::Trim,
            before: text,
            after: trimmed.clone(),
        });
    }
    out.values.insert(column.to_string(), Value::String(trimmed));
}

/// When Flow is blank, detect it from which amount column is populated.
/// Income wins when both are present.
fn infer_flow(out: &mut TransformedRow, raw: &RawRow) {
    if !value_is_blank(out.values.get(columns::FLOW)) {
        return;
    }
    let income_populated = !raw.get(columns::INCOME_AMOUNT).is_empty();
    let outgoing_populated = !raw.get(columns::OUTGOING_AMOUNT).is_empty();
    let inferred = if income_populated {
        Some(Flow::Entrada)
    } else if outgoing_populated {
        Some(Flow::Saida)
    } else {
        None
    };
    if let Some(flow) = inferred {
        out.values.insert(
            columns::FLOW.to_string(),
            Value::String(flow.as_str().to_string()),
        );
        out.log.push(TransformLogEntry {
            column: columns::FLOW.to_string(),
            kind: TransformKind::FlowInferred,
            before: String::new(),
            after: flow.as_str().to_string(),
        });
    }
}

/// Fill blank category fields from the keyword table, recording one
/// suggestion per filled field. No match leaves the fields blank.
fn predict_categories(out: &mut TransformedRow, catalog: &KeywordCatalog) {
    let description = match out.values.get(columns::DESCRIPTION) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => return,
    };

    let targets = [
        columns::MAJOR_CATEGORY,
        columns::CATEGORY,
        columns::SUB_CATEGORY,
    ];
    if targets
        .iter()
        .all(|col| !value_is_blank(out.values.get(*col)))
    {
        return;
    }

    let Some(guess) = catalog.predict(&description) else {
        return;
    };

    let filled = [
        (columns::MAJOR_CATEGORY, guess.major.clone()),
        (columns::CATEGORY, guess.category.clone()),
        (columns::SUB_CATEGORY, guess.sub_category.clone()),
    ];
    for (column, value) in filled {
        if value_is_blank(out.values.get(column)) {
            out.values
                .insert(column.to_string(), Value::String(value.clone()));
            out.suggestions.push(Suggestion {
                column: column.to_string(),
                value,
                reasoning: format!("Matched keyword \"{}\" in description", guess.keyword),
            });
        }
    }
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
