//! Command-line interface for barcoder.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **demultiplex**: Split FASTQ files into per-readset files by barcode
//! - **barcodes**: List the barcodes in a barcode table
//!
//! ## Usage
//!
//! ```text
//! # Exact matches only, outputs next to the input
//! barcoder demultiplex --barcodes mids.tsv --readsets samples.tsv lane1.fastq.gz
//!
//! # Tolerate one mismatch and one base of offset, gzip the outputs
//! barcoder demultiplex -b mids.tsv -r samples.tsv -e 1 --offset 1 --gzip -o out/ lane1.fastq.gz
//!
//! # Paired-end input
//! barcoder demultiplex -b mids.tsv -r samples.tsv lane1_R1.fastq.gz --mate lane1_R2.fastq.gz
//!
//! # JSON statistics for scripting
//! barcoder --format json demultiplex -b mids.tsv -r samples.tsv lane1.fastq
//! ```

use clap::{Parser, Subcommand};

pub mod barcodes;
pub mod demultiplex;

#[derive(Parser)]
#[command(name = "barcoder")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Demultiplex and trim barcoded FASTQ reads into per-sample files")]
#[command(
    long_about = "barcoder finds barcodes (MIDs) at the 5' and 3' ends of each read, assigns the read to the samples (readsets) those barcodes identify, and writes it with the barcodes trimmed off.\n\nMismatches, offsets from the read end and partially deleted barcodes can be tolerated. Reads that match no readset are written to an unknowns file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split FASTQ files into per-readset files by barcode
    Demultiplex(demultiplex::DemultiplexArgs),

    /// List the barcodes in a barcode table
    Barcodes(barcodes::BarcodesArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
