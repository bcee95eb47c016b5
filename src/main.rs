//! CLI for bibtidy - sort and clean bibliography entries based on the
//! citation keys used in a LaTeX project.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use bibtidy::output::OutputLayout;
use bibtidy::{BibError, Pipeline, PipelineConfig, Strictness, Venue};

/// Reconcile LaTeX citations against BibTeX databases
#[derive(Parser)]
#[command(name = "bibtidy")]
#[command(version)]
#[command(after_help = "\
Examples:
  bibtidy paper/ --venue chi
  bibtidy paper/ --venue cvpr --strict --normalize-authors
  bibtidy paper/ --bib-suffix reference.bib --combined")]
struct Cli {
    /// Directory containing the LaTeX sources and bibliography files
    project_dir: PathBuf,

    /// Filename suffix selecting bibliography database files
    #[arg(long, default_value = ".bib")]
    bib_suffix: String,

    /// Venue profile: generic, cvpr, or chi
    #[arg(long, default_value = "generic")]
    venue: String,

    /// Remove fields outside the venue's required list
    #[arg(long)]
    strict: bool,

    /// Rewrite author fields as "Last, First"
    #[arg(long)]
    normalize_authors: bool,

    /// Pad entries with placeholder fields seen on same-type siblings
    #[arg(long)]
    unify_fields: bool,

    /// Write one combined artifact instead of separate used/unused files
    #[arg(long)]
    combined: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        if matches!(e, BibError::UnknownVenue(_)) {
            let names: Vec<_> = Venue::ALL.iter().map(Venue::name).collect();
            eprintln!("  available venue profiles: {}", names.join(", "));
        }
        process::exit(1);
    }
}

fn run() -> bibtidy::Result<()> {
    let cli = Cli::parse();

    // The venue selector is validated before any file I/O happens.
    let venue: Venue = cli.venue.parse()?;

    let config = PipelineConfig {
        venue,
        strictness: if cli.strict {
            Strictness::Strict
        } else {
            Strictness::Permissive
        },
        normalize_authors: cli.normalize_authors,
        unify_fields: cli.unify_fields,
        layout: if cli.combined {
            OutputLayout::Combined
        } else {
            OutputLayout::Split
        },
        bib_suffix: cli.bib_suffix,
    };

    let summary = Pipeline::new(config).run(&cli.project_dir)?;
    for path in &summary.output_paths {
        println!("Processed bibliography saved to {}", path.display());
    }
    Ok(())
}
