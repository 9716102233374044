use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::catalog::store::BarcodeCatalog;
use crate::cli::OutputFormat;
use crate::demux::{Demultiplexer, RunOutcome, RunParameters};
use crate::matching::engine::MatchingConfig;
use crate::parsing::tables::parse_readset_file;
use crate::utils::validation::default_output_dir;

#[derive(Args)]
pub struct DemultiplexArgs {
    /// FASTQ input file(s), plain or gzip-compressed
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Mate FASTQ for each input, in the same order, for paired-end data
    #[arg(long = "mate", num_args = 1..)]
    pub mates: Vec<PathBuf>,

    /// Barcode table (CSV or TSV with `name` and `sequence` columns)
    #[arg(short, long, required = true)]
    pub barcodes: PathBuf,

    /// Readset table (CSV or TSV with `name`, `mid5` and `mid3` columns)
    #[arg(short, long, required = true)]
    pub readsets: PathBuf,

    /// Output directory (defaults to the directory of the first input)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Maximum edit distance between a barcode and the read
    #[arg(short = 'e', long, default_value = "0")]
    pub edit_distance: usize,

    /// Maximum number of bases a barcode may sit away from the read end
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Maximum number of leading barcode bases that may be missing
    #[arg(long, default_value = "0")]
    pub deletions: usize,

    /// Read barcodes from the read header (e.g. `1:N:0:ACGT+TTGA`) instead of the sequence
    #[arg(long)]
    pub barcodes_in_header: bool,

    /// Try every barcode at both ends, not just those the readsets name
    #[arg(long)]
    pub scan_all: bool,

    /// Write a log of every candidate barcode match
    #[arg(long)]
    pub detail_log: bool,

    /// Do not write the per-read summary log
    #[arg(long)]
    pub no_summary_log: bool,

    /// Gzip the output FASTQ files and logs
    #[arg(long)]
    pub gzip: bool,
}

impl DemultiplexArgs {
    fn to_params(&self) -> RunParameters {
        RunParameters {
            matching: MatchingConfig {
                max_edit_distance: self.edit_distance,
                max_offset: self.offset,
                max_deletions: self.deletions,
            },
            barcodes_in_header: self.barcodes_in_header,
            scan_all_barcodes_both_ends: self.scan_all,
            enable_detail_log: self.detail_log,
            enable_summary_log: !self.no_summary_log,
            compress_output: self.gzip,
        }
    }
}

/// Execute demultiplex subcommand
///
/// # Errors
///
/// Returns an error if the tables cannot be loaded, the configuration is
/// invalid, or the inputs cannot be read or the outputs written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DemultiplexArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = BarcodeCatalog::load_from_file(&args.barcodes)
        .with_context(|| format!("Failed to load barcodes from {}", args.barcodes.display()))?;
    let readsets = parse_readset_file(&args.readsets)
        .with_context(|| format!("Failed to load readsets from {}", args.readsets.display()))?;

    if verbose {
        eprintln!(
            "Loaded {} barcodes and {} readsets",
            catalog.len(),
            readsets.len()
        );
    }

    let params = args.to_params();
    let demux = Demultiplexer::new(&catalog, &readsets, params)?;

    let output_dir = match (&args.output_dir, args.inputs.first()) {
        (Some(dir), _) => dir.clone(),
        (None, Some(first)) => default_output_dir(first),
        (None, None) => PathBuf::from("."),
    };
    let outcome = demux.run(&args.inputs, &args.mates, &output_dir)?;

    match format {
        OutputFormat::Text => print_text_results(&outcome)?,
        OutputFormat::Json => print_json_results(&outcome, demux.params())?,
        OutputFormat::Tsv => outcome.statistics.write_tsv(&mut std::io::stdout().lock())?,
    }

    Ok(())
}

fn print_text_results(outcome: &RunOutcome) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    outcome.statistics.write_text(&mut out)?;

    for log in [&outcome.summary_log, &outcome.detail_log].into_iter().flatten() {
        writeln!(out, "Log written to {}", log.display())?;
    }
    Ok(())
}

fn print_json_results(outcome: &RunOutcome, params: &RunParameters) -> anyhow::Result<()> {
    let mut output = outcome.statistics.to_json(chrono::Utc::now());
    output["parameters"] = serde_json::to_value(params)?;
    output["outputs"] = serde_json::to_value(&outcome.outputs)?;
    output["summary_log"] = serde_json::to_value(&outcome.summary_log)?;
    output["detail_log"] = serde_json::to_value(&outcome.detail_log)?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
