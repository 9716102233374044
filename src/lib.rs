//! # barcoder
//!
//! A library for demultiplexing barcoded sequencing reads.
//!
//! Pooled libraries tag each sample with short barcodes (MIDs) at the 5' end,
//! the 3' end, or both. `barcoder` finds those barcodes in every read, assigns
//! the read to the readsets (samples) whose barcodes it carries, trims the
//! barcodes off and writes the read to a per-readset FASTQ file.
//!
//! ## Features
//!
//! - **Tolerant matching**: Levenshtein distance, offsets from the read end, and
//!   partially deleted barcodes
//! - **Unambiguous calls**: a tie at the best distance is never guessed
//! - **Paired-end input**: both mates routed to the readset they agree on
//! - **Header barcodes**: use indexes already called by the sequencer
//! - **Audit logs**: per-candidate detail log and per-record summary log
//!
//! ## Example
//!
//! ```rust,no_run
//! use barcoder::{BarcodeCatalog, Demultiplexer, ReadsetDefinition, RunParameters};
//! use barcoder::parsing::tables::parse_readset_file;
//! use std::path::{Path, PathBuf};
//!
//! let catalog = BarcodeCatalog::load_from_file(Path::new("mids.tsv")).unwrap();
//! let readsets: Vec<ReadsetDefinition> = parse_readset_file(Path::new("samples.tsv")).unwrap();
//!
//! let demux = Demultiplexer::new(&catalog, &readsets, RunParameters::default()).unwrap();
//! let outcome = demux
//!     .run(&[PathBuf::from("lane1.fastq.gz")], &[], Path::new("out"))
//!     .unwrap();
//!
//! for (readset, count) in &outcome.statistics.readset_counts {
//!     println!("{readset}: {count}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Barcode catalog storage and scan planning
//! - [`core`]: Core data types for barcodes, readsets and reads
//! - [`matching`]: Barcode search, best-match selection and classification
//! - [`demux`]: The demultiplexing run
//! - [`output`]: FASTQ buckets, logs and run statistics
//! - [`parsing`]: Parsers for FASTQ files and barcode/readset tables
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod demux;
pub mod matching;
pub mod output;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::store::BarcodeCatalog;
pub use core::read::Read;
pub use core::readset::ReadsetDefinition;
pub use core::tag::BarcodeTag;
pub use core::types::*;
pub use demux::{Demultiplexer, RunParameters};
pub use matching::candidates::Match;
pub use matching::engine::{EndMatcher, MatchingConfig};
pub use output::stats::RunStatistics;
