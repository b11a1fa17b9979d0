//! `fluxo template` - write an empty import template workbook

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use fluxo_core::{template_filename, template_workbook, Template};

pub fn cmd_template(template_type: &str, output: Option<&Path>) -> Result<()> {
    let template = Template::lookup(template_type)?;
    let buffer = template_workbook(&template)?;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(template_filename(
            template.template_type,
            chrono::Utc::now().date_naive(),
        )),
    };
    std::fs::write(&path, buffer)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Template written to {}", path.display());
    Ok(())
}
