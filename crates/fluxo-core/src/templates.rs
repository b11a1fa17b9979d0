//! Template registry for the four supported bulk-import schemas
//!
//! Each template defines the ordered column set an uploaded spreadsheet must
//! carry and the per-column validation rules. Column specifications are
//! immutable; lookup is pure.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Column names used by the templates. Headers in uploaded files must match
/// these exactly; there is no fuzzy header matching.
pub mod columns {
    pub const DATE: &str = "Date";
    pub const DESCRIPTION: &str = "Description";
    pub const BANK: &str = "Bank";
    pub const ORIGIN: &str = "Origin";
    pub const FLOW: &str = "Flow";
    pub const OUTGOING_AMOUNT: &str = "Outgoing Amount";
    pub const INCOME_AMOUNT: &str = "Income Amount";
    pub const MAJOR_CATEGORY: &str = "Major Category";
    pub const CATEGORY: &str = "Category";
    pub const SUB_CATEGORY: &str = "Sub Category";
    pub const NAME: &str = "Name";
}

/// The four recognized bulk-import schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateType {
    Transactions,
    Categories,
    Origins,
    Banks,
}

impl TemplateType {
    pub const ALL: [TemplateType; 4] = [
        TemplateType::Transactions,
        TemplateType::Categories,
        TemplateType::Origins,
        TemplateType::Banks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Transactions => "transactions",
            TemplateType::Categories => "categories",
            TemplateType::Origins => "origins",
            TemplateType::Banks => "banks",
        }
    }

    /// Parse a template identifier, failing with the offending name.
    pub fn parse(s: &str) -> Result<TemplateType> {
        match s.trim().to_lowercase().as_str() {
            "transactions" => Ok(TemplateType::Transactions),
            "categories" => Ok(TemplateType::Categories),
            "origins" => Ok(TemplateType::Origins),
            "banks" => Ok(TemplateType::Banks),
            _ => Err(Error::UnknownTemplateType(s.trim().to_string())),
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TemplateType::parse(s)
    }
}

/// Expected value kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Date,
    Amount,
    Flow,
    Text,
}

/// Specification of one template column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: ValueKind,
}

const fn col(name: &'static str, required: bool, kind: ValueKind) -> ColumnSpec {
    ColumnSpec {
        name,
        required,
        kind,
    }
}

/// Transactions require Date, Bank and Flow up front; the amount columns are
/// governed by the pair rule in the transformer (at least one populated).
const TRANSACTION_COLUMNS: &[ColumnSpec] = &[
    col(columns::DATE, true, ValueKind::Date),
    col(columns::DESCRIPTION, false, ValueKind::Text),
    col(columns::BANK, true, ValueKind::Text),
    col(columns::ORIGIN, false, ValueKind::Text),
    col(columns::FLOW, true, ValueKind::Flow),
    col(columns::OUTGOING_AMOUNT, false, ValueKind::Amount),
    col(columns::INCOME_AMOUNT, false, ValueKind::Amount),
    col(columns::MAJOR_CATEGORY, false, ValueKind::Text),
    col(columns::CATEGORY, false, ValueKind::Text),
    col(columns::SUB_CATEGORY, false, ValueKind::Text),
];

const CATEGORY_COLUMNS: &[ColumnSpec] = &[
    col(columns::MAJOR_CATEGORY, true, ValueKind::Text),
    col(columns::CATEGORY, true, ValueKind::Text),
    col(columns::SUB_CATEGORY, false, ValueKind::Text),
];

const ORIGIN_COLUMNS: &[ColumnSpec] = &[col(columns::NAME, true, ValueKind::Text)];

const BANK_COLUMNS: &[ColumnSpec] = &[col(columns::NAME, true, ValueKind::Text)];

/// An immutable template: the ordered column specifications for one
/// import type.
#[derive(Debug, Clone, Copy)]
pub struct Template {
    pub template_type: TemplateType,
    pub columns: &'static [ColumnSpec],
}

impl Template {
    /// Pure registry lookup.
    pub fn for_type(template_type: TemplateType) -> Template {
        let columns = match template_type {
            TemplateType::Transactions => TRANSACTION_COLUMNS,
            TemplateType::Categories => CATEGORY_COLUMNS,
            TemplateType::Origins => ORIGIN_COLUMNS,
            TemplateType::Banks => BANK_COLUMNS,
        };
        Template {
            template_type,
            columns,
        }
    }

    /// Convenience lookup from an identifier string.
    pub fn lookup(identifier: &str) -> Result<Template> {
        Ok(Template::for_type(TemplateType::parse(identifier)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!(
            TemplateType::parse("transactions").unwrap(),
            TemplateType::Transactions
        );
        assert_eq!(
            TemplateType::parse("Categories").unwrap(),
            TemplateType::Categories
        );
        assert_eq!(
            TemplateType::parse(" origins ").unwrap(),
            TemplateType::Origins
        );
        assert_eq!(TemplateType::parse("banks").unwrap(), TemplateType::Banks);
    }

    #[test]
    fn test_parse_unknown_type_names_offender() {
        let err = TemplateType::parse("invalid").unwrap_err();
        assert!(err.to_string().contains("invalid"));
    }

    #[test]
    fn test_transactions_required_columns() {
        let template = Template::for_type(TemplateType::Transactions);
        let required: Vec<&str> = template
            .columns
            .iter()
            .filter(|c| c.required)
            .map(|c| c.name)
            .collect();
        assert_eq!(required, vec!["Date", "Bank", "Flow"]);
    }

    #[test]
    fn test_origins_and_banks_require_only_name() {
        for ty in [TemplateType::Origins, TemplateType::Banks] {
            let template = Template::for_type(ty);
            assert_eq!(template.columns.len(), 1);
            assert!(template.columns[0].required);
            assert_eq!(template.columns[0].name, "Name");
        }
    }

    #[test]
    fn test_round_trip_identifiers() {
        for ty in TemplateType::ALL {
            assert_eq!(TemplateType::parse(ty.as_str()).unwrap(), ty);
        }
    }

    #[test]
    fn test_lookup_by_identifier() {
        let template = Template::lookup("transactions").unwrap();
        assert_eq!(template.template_type, TemplateType::Transactions);
        assert!(!template.columns.is_empty());
        assert!(Template::lookup("payees").is_err());
    }
}
