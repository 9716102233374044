use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::catalog::store::BarcodeCatalog;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct BarcodesArgs {
    /// Barcode table (CSV or TSV with `name` and `sequence` columns)
    #[arg(short, long, required = true)]
    pub barcodes: PathBuf,
}

/// Execute barcodes subcommand
///
/// # Errors
///
/// Returns an error if the barcode table cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: BarcodesArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = BarcodeCatalog::load_from_file(&args.barcodes)
        .with_context(|| format!("Failed to load barcodes from {}", args.barcodes.display()))?;

    if verbose {
        eprintln!("Loaded {} barcodes from {}", catalog.len(), args.barcodes.display());
    }

    let tags = catalog.sorted();
    match format {
        OutputFormat::Text => {
            let width = tags.iter().map(|t| t.name().len()).max().unwrap_or(0);
            for tag in &tags {
                println!(
                    "{:<width$}  {}  (revcomp {})",
                    tag.name(),
                    tag.sequence(),
                    tag.reverse_complement()
                );
            }
            println!("\n{} barcodes", tags.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tags)?);
        }
        OutputFormat::Tsv => {
            println!("name\tsequence\treverse_complement");
            for tag in &tags {
                println!("{}\t{}\t{}", tag.name(), tag.sequence(), tag.reverse_complement());
            }
        }
    }

    Ok(())
}
