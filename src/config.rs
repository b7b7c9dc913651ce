use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::transpiler::TranspileOptions;

pub const CONFIG_FILE: &str = "recompose.toml";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub migrate: MigrateConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MigrateConfig {
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_suffix")]
    pub suffix: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_index_file")]
    pub index_file: String,
    /// Component directories already migrated by hand
    #[serde(default)]
    pub skip: Vec<String>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            suffix: default_suffix(),
            extensions: default_extensions(),
            index_file: default_index_file(),
            skip: Vec::new(),
        }
    }
}

fn default_root() -> String {
    "src/components".to_string()
}

fn default_suffix() -> String {
    ".composition".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["js".to_string(), "ts".to_string()]
}

fn default_index_file() -> String {
    "index".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_framework")]
    pub framework: String,
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            framework: default_framework(),
            indent: default_indent(),
        }
    }
}

fn default_framework() -> String {
    "vue".to_string()
}

fn default_indent() -> usize {
    2
}

impl Config {
    pub fn transpile_options(&self) -> TranspileOptions {
        TranspileOptions {
            framework: self.output.framework.clone(),
            indent: self.output.indent,
        }
    }
}

/// Load and parse a recompose.toml configuration file
pub fn load_config(path: &str) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!("could not find `{}`", path)
        } else {
            anyhow::anyhow!("failed to read `{}`: {}", path, e)
        }
    })?;

    parse_config(&content).map_err(|e| anyhow::anyhow!("failed to parse `{}`: {}", path, e))
}

/// Explicit path if given, else `recompose.toml` when present, else defaults
pub fn load_or_default(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(CONFIG_FILE).exists() => load_config(CONFIG_FILE),
        None => Ok(Config::default()),
    }
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let suffix = &config.migrate.suffix;
    if suffix.is_empty() {
        anyhow::bail!("Invalid suffix: must not be empty");
    }
    if suffix.contains(['/', '\\']) {
        anyhow::bail!("Invalid suffix '{}': must not contain path separators", suffix);
    }

    if config.migrate.extensions.is_empty() {
        anyhow::bail!("Invalid extensions: at least one file extension is required");
    }
    for ext in &config.migrate.extensions {
        if ext.is_empty() || ext.starts_with('.') {
            anyhow::bail!(
                "Invalid extension '{}'. Use the bare extension (e.g., 'ts')",
                ext
            );
        }
    }

    if config.output.indent == 0 {
        anyhow::bail!("Invalid indent: must be at least 1");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.migrate.root, "src/components");
        assert_eq!(config.migrate.suffix, ".composition");
        assert_eq!(config.migrate.extensions, vec!["js", "ts"]);
        assert_eq!(config.migrate.index_file, "index");
        assert!(config.migrate.skip.is_empty());
        assert_eq!(config.output.framework, "vue");
        assert_eq!(config.output.indent, 2);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
[migrate]
skip = ["Button", "Icon"]

[output]
indent = 4
"#,
        )
        .unwrap();
        assert_eq!(config.migrate.skip, vec!["Button", "Icon"]);
        assert_eq!(config.migrate.suffix, ".composition");
        assert_eq!(config.output.indent, 4);
        assert_eq!(config.output.framework, "vue");
        assert_eq!(config.transpile_options().indent, 4);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config.migrate.root, "src/components");
    }

    #[test]
    fn test_invalid_values() {
        assert!(parse_config("[migrate]\nsuffix = \"\"").is_err());
        assert!(parse_config("[migrate]\nsuffix = \"a/b\"").is_err());
        assert!(parse_config("[migrate]\nextensions = []").is_err());
        assert!(parse_config("[migrate]\nextensions = [\".ts\"]").is_err());
        assert!(parse_config("[output]\nindent = 0").is_err());
        assert!(parse_config("[output]\nindent = \"two\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config("does-not-exist.toml").unwrap_err();
        assert!(err.to_string().contains("could not find"));
    }
}
