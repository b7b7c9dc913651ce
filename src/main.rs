use clap::{Parser, Subcommand};
use colored::Colorize;
use recompose::commands;

#[derive(Parser)]
#[command(name = "recompose")]
#[command(about = "Migrate options-object components to composable functions", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to recompose.toml (default: ./recompose.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate every component under the component root
    Migrate {
        /// Component root (defaults to `migrate.root` from the config)
        root: Option<String>,
        /// Transform every file without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Only print the final summary
        #[arg(short, long)]
        quiet: bool,
    },
    /// Migrate a single file and print the result to stdout
    File {
        /// Path to the component source file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Some(Commands::Migrate { root, dry_run, quiet }) => {
            commands::migrate::execute(root.as_deref(), config, dry_run, quiet)
        }
        Some(Commands::File { file }) => {
            commands::file::execute(&file, config)
        }
        None => {
            commands::migrate::execute(None, config, false, false)
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
