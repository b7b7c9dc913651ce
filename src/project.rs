use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::MigrateConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: PathBuf,           // src/components/Button/Button.js
    pub output_path: PathBuf,    // src/components/Button/Button.composition.js
    pub component_name: String,  // Button
}

/// Everything found under the component root
#[derive(Debug, Default)]
pub struct Discovery {
    pub sources: Vec<SourceFile>,
    /// Files carrying the doubled suffix, left behind by an earlier bad run
    pub stale: Vec<PathBuf>,
    /// Files already carrying the output suffix
    pub skipped: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
enum FileKind {
    Source,
    Output,
    Stale,
    Index,
    Ignored,
}

/// Walk the component root in file-name order, pruning skipped directories
pub fn discover_files(root: &Path, config: &MigrateConfig) -> Result<Discovery> {
    if !root.is_dir() {
        anyhow::bail!(
            "Component directory '{}' not found. Are you in the project root?",
            root.display()
        );
    }

    let mut discovery = Discovery::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e.path(), root, config));

    for entry in walker {
        let entry = entry.context(format!("Failed to read {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        match classify_file(path, config) {
            FileKind::Source => discovery.sources.push(source_file(path, &config.suffix)?),
            FileKind::Stale => discovery.stale.push(path.to_path_buf()),
            FileKind::Output => discovery.skipped.push(path.to_path_buf()),
            FileKind::Index | FileKind::Ignored => {}
        }
    }

    Ok(discovery)
}

/// A directory is skipped when its name or its path below the root is listed
fn is_skipped_dir(path: &Path, root: &Path, config: &MigrateConfig) -> bool {
    if !path.is_dir() {
        return false;
    }
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    let relative = path.strip_prefix(root).unwrap_or(path);

    config
        .skip
        .iter()
        .any(|skip| skip == name || Path::new(skip) == relative)
}

fn classify_file(path: &Path, config: &MigrateConfig) -> FileKind {
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    if !config.extensions.iter().any(|e| e == extension) {
        return FileKind::Ignored;
    }

    let stem = match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => stem,
        None => return FileKind::Ignored,
    };

    let doubled = format!("{}{}", config.suffix, config.suffix);
    if stem.ends_with(&doubled) {
        FileKind::Stale
    } else if stem.ends_with(&config.suffix) {
        FileKind::Output
    } else if stem == config.index_file {
        FileKind::Index
    } else {
        FileKind::Source
    }
}

fn source_file(path: &Path, suffix: &str) -> Result<SourceFile> {
    let component_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid filename: {}", path.display()))?
        .to_string();

    Ok(SourceFile {
        path: path.to_path_buf(),
        output_path: output_path(path, suffix),
        component_name,
    })
}

/// `Button.js` → `Button<suffix>.js`, next to the source
pub fn output_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    path.with_file_name(file_name)
}
