use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config;
use crate::transpiler;

/// Migrate a single component file and print the result to stdout
pub fn execute(file_path: &str, config_path: Option<&str>) -> Result<()> {
    let path = Path::new(file_path);
    if !path.exists() {
        anyhow::bail!("File not found: {}", file_path);
    }

    let config = config::load_or_default(config_path)?;

    let source = fs::read_to_string(path)
        .context(format!("Failed to read {}", file_path))?;

    let component_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Component");

    let output = transpiler::transpile_with(&source, component_name, &config.transpile_options())
        .map_err(|e| anyhow::anyhow!("{}: {}", file_path, e))?;

    print!("{}", output);

    Ok(())
}
