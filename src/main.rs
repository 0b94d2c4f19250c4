mod diagnostics;
mod export;
mod metadata;
mod model;
mod parser;
mod settings;
mod verify;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use metadata::SideTable;
use model::Corpus;
use settings::{Settings, DEFAULT_CONFIG_PATH};
use tracing::warn;

#[derive(Parser)]
#[command(name = "takashima", about = "Extract Takashima hexagram commentary into JSON")]
struct Cli {
    /// Settings file (TOML); missing file means defaults
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the commentary text into one merged JSON document
    Parse {
        /// UTF-8 commentary text
        input: PathBuf,
        /// Side-table JSON mapping hexagram name to code/pinyin/palace
        #[arg(short, long)]
        table: Option<PathBuf>,
        /// Merged output (default from settings)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Split a merged JSON document into per-hexagram files plus a code index
    Split {
        /// Merged JSON document (default from settings)
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short = 'd', long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        index: Option<PathBuf>,
    },
    /// Report missing hexagrams, lines and empty fields
    Verify {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Parse + split + verify in one go
    Run {
        input: PathBuf,
        #[arg(short, long)]
        table: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;

    let result = match cli.command {
        Commands::Parse {
            input,
            table,
            output,
        } => {
            let output = output.unwrap_or_else(|| settings.output.clone());
            parse_file(&input, table.as_deref(), &output, &settings)?;
            Ok(())
        }
        Commands::Split {
            input,
            out_dir,
            index,
        } => {
            let input = input.unwrap_or_else(|| settings.output.clone());
            let corpus = Corpus::load(&input)?;
            let out_dir = out_dir.unwrap_or_else(|| settings.split_dir.clone());
            let index = index.unwrap_or_else(|| settings.index_path.clone());
            split_corpus(&corpus, &out_dir, &index)
        }
        Commands::Verify { input } => {
            let input = input.unwrap_or_else(|| settings.output.clone());
            let corpus = Corpus::load(&input)?;
            report_completeness(&corpus);
            Ok(())
        }
        Commands::Run { input, table } => {
            let corpus = parse_file(&input, table.as_deref(), &settings.output, &settings)?;
            split_corpus(&corpus, &settings.split_dir, &settings.index_path)?;
            println!();
            report_completeness(&corpus);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn parse_file(
    input: &Path,
    table: Option<&Path>,
    output: &Path,
    settings: &Settings,
) -> anyhow::Result<Corpus> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let table = SideTable::load_or_empty(table)?;

    let extraction = parser::extract(&text, &table, settings);
    extraction.corpus.save(output)?;

    if extraction.corpus.is_empty() {
        println!("No hexagrams found in {}.", input.display());
    }
    println!(
        "Parsed {} hexagrams from {} -> {}",
        extraction.corpus.len(),
        input.display(),
        output.display()
    );
    if !extraction.start_found() {
        println!("Warning: start marker not found, results may include table-of-contents entries.");
    }
    if !extraction.diagnostics.is_empty() {
        println!("{} diagnostics:", extraction.diagnostics.len());
        for d in &extraction.diagnostics {
            println!("  {}", d);
        }
    }
    Ok(extraction.corpus)
}

fn report_completeness(corpus: &Corpus) {
    let report = verify::check(corpus);
    report.print();
    if !report.is_clean() {
        warn!(
            "{} missing and {} empty items",
            report.missing.len(),
            report.empty.len()
        );
    }
}

fn split_corpus(corpus: &Corpus, out_dir: &Path, index: &Path) -> anyhow::Result<()> {
    let stats = export::split(corpus, out_dir, index)?;
    println!(
        "Split complete. {} files created in {} ({} codes indexed in {}).",
        stats.files,
        stats.out_dir.display(),
        stats.indexed,
        index.display()
    );
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
