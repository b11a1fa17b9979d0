//! Spreadsheet decoding for uploaded files
//!
//! Decodes an in-memory upload (.xlsx/.xls/.csv) into an ordered sequence of
//! raw rows keyed by header text. The first row is always the header;
//! header text is used verbatim as column keys.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{CellValue, RawRow};

/// Magic bytes: ZIP container (xlsx) and OLE compound document (xls).
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// Decode an uploaded binary into raw rows.
///
/// Format is sniffed from magic bytes; anything that is not an Excel
/// container is treated as CSV. Entirely empty rows are skipped, but row
/// numbering still reflects positions in the source sheet (header is row 1,
/// first data row is row 2).
pub fn read_rows(data: &[u8]) -> Result<Vec<RawRow>> {
    if data.starts_with(ZIP_MAGIC) || data.starts_with(OLE_MAGIC) {
        read_excel(data)
    } else {
        read_csv(data)
    }
}

fn read_excel(data: &[u8]) -> Result<Vec<RawRow>> {
    let cursor = Cursor::new(data);
    let mut workbook = open_workbook_auto_from_rs(cursor)?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::Parse("Spreadsheet has no sheets".to_string()))?;

    let range = workbook.worksheet_range(&sheet)?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for (i, row) in rows_iter.enumerate() {
        // Header occupies sheet row 1; this data row is sheet row i + 2.
        let mut raw = RawRow::new(i + 2);
        let mut cells = HashMap::new();
        for (col, cell) in row.iter().enumerate() {
            let Some(header) = headers.get(col) else {
                continue;
            };
            if header.is_empty() {
                continue;
            }
            cells.insert(header.clone(), cell_value(cell));
        }
        if cells.values().all(|v| v.is_empty()) {
            continue;
        }
        raw.cells = cells;
        rows.push(raw);
    }

    debug!("Decoded {} rows from sheet '{}'", rows.len(), sheet);
    Ok(rows)
}

fn read_csv(data: &[u8]) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // The csv reader hides blank lines entirely; take the row number from
        // the record's position in the source so numbering matches the sheet.
        let number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(i + 2);
        let mut raw = RawRow::new(number);
        let mut cells = HashMap::new();
        for (col, value) in record.iter().enumerate() {
            let Some(header) = headers.get(col) else {
                continue;
            };
            if header.is_empty() {
                continue;
            }
            let cell = if value.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(value.to_string())
            };
            cells.insert(header.clone(), cell);
        }
        if cells.values().all(|v| v.is_empty()) {
            continue;
        }
        raw.cells = cells;
        rows.push(raw);
    }

    debug!("Decoded {} rows from CSV", rows.len());
    Ok(rows)
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => CellValue::Text(excel_serial_to_iso(dt.as_f64())),
        Data::DateTimeIso(s) => {
            // Keep the date part only; times are irrelevant to imports.
            let date = s.split('T').next().unwrap_or(s);
            CellValue::Text(date.to_string())
        }
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

/// Convert an Excel serial date to ISO text.
///
/// Excel's epoch is 1899-12-30 (accounting for the 1900 leap year bug).
pub(crate) fn excel_serial_to_iso(serial: f64) -> String {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch");
    let date = base + Duration::days(serial as i64);
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_rows() {
        let csv = "Name\nSantander\n\nMillennium\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 2);
        assert_eq!(rows[0].get("Name"), &CellValue::Text("Santander".into()));
        // Blank line in the middle is skipped but numbering is preserved
        assert_eq!(rows[1].number, 4);
    }

    #[test]
    fn test_read_csv_empty_cells() {
        let csv = "Date,Bank\n2024-05-01,\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get("Bank").is_empty());
        assert_eq!(rows[0].get("Date"), &CellValue::Text("2024-05-01".into()));
    }

    #[test]
    fn test_unknown_header_cells_ignored() {
        let csv = "Name,,Extra\nBCP,x,y\n";
        let rows = read_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].get("Name"), &CellValue::Text("BCP".into()));
        assert_eq!(rows[0].cells.len(), 2);
    }

    #[test]
    fn test_excel_serial_to_iso() {
        // 45292 = 2024-01-01
        assert_eq!(excel_serial_to_iso(45292.0), "2024-01-01");
    }

    #[test]
    fn test_corrupt_excel_fails_decode() {
        // ZIP magic followed by garbage
        let mut data = b"PK\x03\x04".to_vec();
        data.extend_from_slice(b"not a real workbook");
        assert!(read_rows(&data).is_err());
    }
}
