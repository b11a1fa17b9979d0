//! CLI tests

use clap::CommandFactory;
use tempfile::TempDir;

use crate::cli::Cli;
use crate::commands::{cmd_template, cmd_validate};

#[test]
fn test_cli_definition() {
    Cli::command().debug_assert();
}

#[test]
fn test_cmd_template_writes_workbook() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("banks.xlsx");

    cmd_template("banks", Some(&path)).unwrap();

    let data = std::fs::read(&path).unwrap();
    assert_eq!(&data[..4], b"PK\x03\x04");
}

#[test]
fn test_cmd_template_rejects_unknown_type() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.xlsx");
    let err = cmd_template("invalid", Some(&path)).unwrap_err();
    assert!(err.to_string().contains("invalid"));
    assert!(!path.exists());
}

#[test]
fn test_cmd_validate_clean_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("banks.csv");
    std::fs::write(&path, "Name\nCGD\nMillennium\n").unwrap();

    cmd_validate(&path, "banks", None).unwrap();
}

#[test]
fn test_cmd_validate_fails_and_writes_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("banks.csv");
    std::fs::write(&path, "Name,Notes\n,pending\n").unwrap();
    let report = dir.path().join("report.xlsx");

    let err = cmd_validate(&path, "banks", Some(&report)).unwrap_err();
    assert!(err.to_string().contains("validation errors"));

    let data = std::fs::read(&report).unwrap();
    assert_eq!(&data[..4], b"PK\x03\x04");
}
