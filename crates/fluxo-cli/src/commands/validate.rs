//! `fluxo validate` - run the pipeline on a local file

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use fluxo_core::{
    error_report_filename, error_report_workbook, parse_and_validate, KeywordCatalog,
    TemplateType,
};

/// How many errors to print inline before pointing at the report.
const PRINTED_ERROR_LIMIT: usize = 10;

pub fn cmd_validate(file: &Path, template_type: &str, report: Option<&Path>) -> Result<()> {
    let data =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let ty = TemplateType::parse(template_type)?;
    let catalog = KeywordCatalog::builtin();

    let result = parse_and_validate(&data, ty, &catalog)?;

    println!(
        "Validated {} {} rows from {}",
        result.total_records(),
        ty,
        file.display()
    );

    let suggestion_count: usize = result.rows.iter().map(|r| r.suggestions.len()).sum();
    if suggestion_count > 0 {
        println!("{} category suggestions applied", suggestion_count);
    }

    if result.is_valid {
        println!("No problems found.");
        return Ok(());
    }

    println!("{} errors:", result.error_count());
    for error in result.errors.iter().take(PRINTED_ERROR_LIMIT) {
        println!(
            "  row {} [{}]: {}",
            error.row, error.column, error.message
        );
    }
    if result.error_count() > PRINTED_ERROR_LIMIT {
        println!(
            "  ... and {} more",
            result.error_count() - PRINTED_ERROR_LIMIT
        );
    }

    let report_path = match report {
        Some(path) => path.to_path_buf(),
        None => {
            let name = error_report_filename(
                &file.file_name().map(|s| s.to_string_lossy().to_string()).unwrap_or_default(),
                chrono::Utc::now().date_naive(),
            );
            file.parent().unwrap_or(Path::new(".")).join(PathBuf::from(name))
        }
    };
    let workbook = error_report_workbook(&result.errors)?;
    std::fs::write(&report_path, workbook)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    println!("Error report written to {}", report_path.display());

    bail!("{} rows had validation errors", failed_row_count(&result));
}

fn failed_row_count(result: &fluxo_core::ValidationResult) -> usize {
    let mut rows: Vec<usize> = result.errors.iter().map(|e| e.row).collect();
    rows.sort_unstable();
    rows.dedup();
    rows.len()
}
