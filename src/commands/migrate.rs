use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::{self, Config};
use crate::project::{discover_files, SourceFile};
use crate::transpiler;

#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    /// Transform every file but write nothing
    pub dry_run: bool,
    pub quiet: bool,
}

/// Represents the result of a migration run
#[derive(Debug, Default)]
pub struct MigrateReport {
    pub migrated: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Migrate every component under the root (config root when not given)
pub fn execute(
    root: Option<&str>,
    config_path: Option<&str>,
    dry_run: bool,
    quiet: bool,
) -> Result<()> {
    let start = Instant::now();

    let config = config::load_or_default(config_path)?;
    let root = PathBuf::from(root.unwrap_or(config.migrate.root.as_str()));
    let options = MigrateOptions { dry_run, quiet };

    let report = run(&root, &config, &options)?;

    let elapsed = start.elapsed();
    let verb = if dry_run { "Checked" } else { "Migrated" };
    println!(
        "{} {} {} component(s) in `{}` ({} removed, {} skipped) in {:.2}s",
        status("Finished"),
        verb,
        report.migrated.len(),
        root.display(),
        report.removed.len(),
        report.skipped.len(),
        elapsed.as_secs_f64()
    );

    Ok(())
}

/// Core batch loop: one file is read, rewritten and written before the next.
/// Files without a component options object are skipped; the first I/O
/// failure aborts the batch.
pub fn run(root: &Path, config: &Config, options: &MigrateOptions) -> Result<MigrateReport> {
    let discovery = discover_files(root, &config.migrate)?;
    let transpile_options = config.transpile_options();
    let mut report = MigrateReport::default();

    let pb = if options.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.dim} {msg}")
                .context("Invalid progress template")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };
    let log = |verb: &str, path: &Path| {
        if !options.quiet {
            pb.suspend(|| println!("{} {}", status(verb), path.display()));
        }
    };

    for path in discovery.stale {
        if !options.dry_run {
            fs::remove_file(&path)
                .context(format!("Failed to remove {}", path.display()))?;
        }
        log("Removed", &path);
        report.removed.push(path);
    }

    for path in discovery.skipped {
        log("Skipping", &path);
        report.skipped.push(path);
    }

    for file in &discovery.sources {
        pb.set_message(format!("Migrating {}", file.component_name));
        if migrate_file(file, &transpile_options, options.dry_run)? {
            log("Migrating", &file.path);
            report.migrated.push(file.output_path.clone());
        } else {
            log("Skipping", &file.path);
            report.skipped.push(file.path.clone());
        }
    }

    pb.finish_and_clear();

    Ok(report)
}

/// Returns false for a helper module with no component in it
fn migrate_file(
    file: &SourceFile,
    options: &transpiler::TranspileOptions,
    dry_run: bool,
) -> Result<bool> {
    let source = fs::read_to_string(&file.path)
        .context(format!("Failed to read {}", file.path.display()))?;

    let Ok(output) = transpiler::transpile_with(&source, &file.component_name, options) else {
        return Ok(false);
    };

    if !dry_run {
        write_atomically(&file.output_path, &output)?;
    }
    Ok(true)
}

/// Write to a sibling `.tmp` file, then rename over the target
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, content)
        .context(format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .context(format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn status(verb: &str) -> colored::ColoredString {
    format!("{:>12}", verb).green().bold()
}
