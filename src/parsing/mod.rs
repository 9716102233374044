//! Parsers for the inputs of a demultiplexing run.
//!
//! This module provides parsers for:
//!
//! - **FASTQ files**: plain or gzip-compressed reads, via `noodles`
//! - **Barcode tables**: CSV/TSV with `name` and `sequence` columns
//! - **Readset tables**: CSV/TSV with `name`, `mid5` and `mid3` columns
//!
//! Tables use a comma delimiter when the file ends in `.csv` and a tab
//! otherwise. Lines starting with `#` are ignored.
//!
//! ## Example
//!
//! ```rust
//! use barcoder::parsing::tables::{parse_barcode_text, parse_readset_text};
//!
//! let tags = parse_barcode_text("name\tsequence\nMID001\tACGAGTGCGT\n", b'\t').unwrap();
//! assert_eq!(tags[0].reverse_complement(), "ACGCACTCGT");
//!
//! let readsets = parse_readset_text("name,mid5,mid3\nS1,MID001,\n", b',').unwrap();
//! assert!(readsets[0].mid3.is_none());
//! ```

pub mod fastq;
pub mod tables;
