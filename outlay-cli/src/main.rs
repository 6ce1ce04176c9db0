use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outlay_core::SourceRegistry;
use outlay_ingest::{ParseOptions, Pipeline};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "outlay", version, about = "Statement normalization CLI")]
struct Cli {
    /// Path to a source registry JSON file (defaults to the built-in one)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse statement files and print canonical transactions as JSON
    Parse {
        /// Statement files (container inferred from the extension)
        files: Vec<PathBuf>,

        /// Force a registry source instead of content detection
        #[arg(long)]
        source: Option<String>,

        /// Include a note per dropped row in the output
        #[arg(long)]
        row_notes: bool,

        /// Reject inputs larger than this many bytes
        #[arg(long)]
        max_bytes: Option<usize>,
    },

    /// List the sources the registry knows about
    Sources,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = match &cli.registry {
        Some(path) => SourceRegistry::from_path(path)
            .with_context(|| format!("loading registry {}", path.display()))?,
        None => SourceRegistry::builtin(),
    };

    match cli.command {
        Command::Parse {
            files,
            source,
            row_notes,
            max_bytes,
        } => {
            let pipeline = Pipeline::new(registry);
            let options = ParseOptions {
                source_hint: source,
                collect_row_notes: row_notes,
                max_bytes,
            };
            let mut outcomes = Vec::with_capacity(files.len());
            for path in &files {
                let bytes = fs::read(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let file_name = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or_default();
                let outcome = pipeline
                    .parse_bytes(&bytes, file_name, &options)
                    .with_context(|| format!("parsing {}", path.display()))?;
                info!(
                    file = %path.display(),
                    source = outcome.source.as_str(),
                    transactions = outcome.transactions.len(),
                    dropped = outcome.dropped_rows,
                    "parsed"
                );
                outcomes.push(outcome);
            }
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        }

        Command::Sources => {
            for entry in registry.entries() {
                println!(
                    "{}\t{:?}\t{} category rules",
                    entry.name,
                    entry.method,
                    entry.category_rules.len()
                );
            }
        }
    }

    Ok(())
}
