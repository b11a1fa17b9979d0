//! Integration tests for fluxo-core
//!
//! These tests exercise the full decode → transform → report workflow the
//! way the server drives it: bytes in, validation result and workbooks out.

use fluxo_core::{
    error_report_workbook, parse_and_validate, read_rows, template_workbook, Error,
    KeywordCatalog, Template, TemplateType,
};
use rust_xlsxwriter::Workbook;

/// A realistic transactions upload mixing clean rows, European formats and
/// several broken cells.
fn transactions_csv() -> &'static str {
    "Date,Description,Bank,Origin,Flow,Outgoing Amount,Income Amount,Major Category,Category,Sub Category\n\
     2024-05-01,continente supermercado,Millennium,comum,SAIDA,\"85,50\",,,,\n\
     1/5/2024,galp gas station fuel purchase,CGD,,SAIDA,\"45,20\",,,,\n\
     03/05/2024,salario maio,Millennium,,,,\"1.234,56\",,,\n\
     bogus,mystery shop,,,INVALID_FLOW,abc,,,,\n"
}

#[test]
fn test_transactions_upload_end_to_end() {
    let catalog = KeywordCatalog::builtin();
    let result = parse_and_validate(
        transactions_csv().as_bytes(),
        TemplateType::Transactions,
        &catalog,
    )
    .unwrap();

    assert_eq!(result.total_records(), 4);
    assert!(!result.is_valid);

    // Row 2 is fully clean after amount normalization
    let first = &result.rows[0];
    assert_eq!(first.row, 2);
    assert_eq!(first.values["Date"], "2024-05-01");
    assert_eq!(first.values["Outgoing Amount"], 85.5);
    assert_eq!(first.values["Origin"], "Comum");
    assert_eq!(first.values["Category"], "Groceries");

    // Row 3 exercises the day-first ambiguous date rule
    assert_eq!(result.rows[1].values["Date"], "2024-05-01");
    assert_eq!(result.rows[1].values["Category"], "Fuel");

    // Row 4 has no flow; it is inferred from the populated income column
    assert_eq!(result.rows[2].values["Flow"], "ENTRADA");
    assert_eq!(result.rows[2].values["Income Amount"], 1234.56);

    // Row 5 carries every problem at once
    let row5_errors: Vec<&str> = result
        .errors
        .iter()
        .filter(|e| e.row == 5)
        .map(|e| e.column.as_str())
        .collect();
    assert!(row5_errors.contains(&"Date"));
    assert!(row5_errors.contains(&"Bank"));
    assert!(row5_errors.contains(&"Flow"));
    assert!(row5_errors.contains(&"Outgoing Amount"));

    // Errors from earlier rows never stop later rows from being evaluated
    assert_eq!(result.errors.iter().filter(|e| e.row < 5).count(), 0);
}

#[test]
fn test_xlsx_upload_is_decoded_like_csv() {
    // Build a small workbook the way a user's spreadsheet app would
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = ["Date", "Description", "Bank", "Flow", "Outgoing Amount"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    sheet.write_string(1, 0, "15/01/2024").unwrap();
    sheet.write_string(1, 1, "farmacia central").unwrap();
    sheet.write_string(1, 2, "CGD").unwrap();
    sheet.write_string(1, 3, "saida").unwrap();
    sheet.write_number(1, 4, 12.3).unwrap();
    let buffer = workbook.save_to_buffer().unwrap();

    let catalog = KeywordCatalog::builtin();
    let result =
        parse_and_validate(&buffer, TemplateType::Transactions, &catalog).unwrap();

    assert!(result.is_valid, "errors: {:?}", result.errors);
    assert_eq!(result.total_records(), 1);
    let row = &result.rows[0];
    assert_eq!(row.values["Date"], "2024-01-15");
    assert_eq!(row.values["Flow"], "SAIDA");
    assert_eq!(row.values["Outgoing Amount"], 12.3);
    assert_eq!(row.values["Category"], "Pharmacy");
}

#[test]
fn test_template_workbooks_validate_cleanly() {
    let catalog = KeywordCatalog::builtin();
    for ty in TemplateType::ALL {
        let template = Template::for_type(ty);
        let buffer = template_workbook(&template).unwrap();
        assert!(!buffer.is_empty());

        // A freshly generated template has a header and no data rows
        let result = parse_and_validate(&buffer, ty, &catalog).unwrap();
        assert_eq!(result.total_records(), 0);
        assert!(result.is_valid);
    }
}

#[test]
fn test_unknown_template_type_is_a_named_failure() {
    let err = TemplateType::parse("invalid").unwrap_err();
    match err {
        Error::UnknownTemplateType(name) => assert_eq!(name, "invalid"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_error_report_matches_error_sequence() {
    let catalog = KeywordCatalog::builtin();
    let result = parse_and_validate(
        transactions_csv().as_bytes(),
        TemplateType::Transactions,
        &catalog,
    )
    .unwrap();

    let report = error_report_workbook(&result.errors).unwrap();
    let rows = read_rows(&report).unwrap();
    assert_eq!(rows.len(), result.errors.len());
    for (row, error) in rows.iter().zip(&result.errors) {
        assert_eq!(row.get("Column").display(), error.column);
        assert_eq!(row.get("Error").display(), error.message);
    }
}
