//! masgraph CLI
//!
//! Command-line interface for turning a FID filing (tab-separated, one row
//! per organisation registration) into a normalized entity-relationship
//! graph document (JSON).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

#[derive(Parser)]
#[command(name = "masgraph")]
#[command(
    author,
    version,
    about = "masgraph: FID filings as entity-relationship graphs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a FID filing (TSV) → graph document (JSON)
    Ingest {
        /// Input filing (tab-separated, header row)
        input: PathBuf,
        /// Output JSON path; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { input, out } => cmd_ingest(&input, out.as_deref()),
    }
}

fn cmd_ingest(input: &Path, out: Option<&Path>) -> Result<()> {
    eprintln!(
        "{} FID filing {}",
        "Ingesting".green().bold(),
        input.display()
    );

    let (document, stats) = masgraph_ingest_fid::ingest_filing(input)?;
    let json = serde_json::to_string_pretty(&document)?;

    match out {
        Some(out) => {
            fs::create_dir_all(out.parent().unwrap_or(Path::new(".")))?;
            fs::write(out, &json)?;
            eprintln!("  {} {}", "→".cyan(), out.display());
        }
        None => println!("{json}"),
    }

    eprintln!(
        "  {} {} companies, {} persons, {} relationships",
        "→".yellow(),
        stats.companies,
        stats.persons,
        stats.relationships
    );
    if stats.skipped_rows > 0 || stats.unparsed_contacts > 0 {
        eprintln!(
            "  {} {} rows skipped (blank organisation), {} contact fields unmatched",
            "→".yellow(),
            stats.skipped_rows,
            stats.unparsed_contacts
        );
    }

    Ok(())
}
