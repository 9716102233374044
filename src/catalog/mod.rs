//! Barcode catalog storage and scan planning.
//!
//! The catalog holds every known barcode by name, with its reverse complement
//! computed once at load time. A [`index::ScanPlan`] then picks which of those
//! barcodes are tried at the 5' and 3' ends of each read, based on the readsets
//! being demultiplexed.
//!
//! ## Example
//!
//! ```rust
//! use barcoder::catalog::index::ScanPlan;
//! use barcoder::{BarcodeCatalog, BarcodeTag, ReadsetDefinition};
//!
//! let catalog = BarcodeCatalog::build(vec![
//!     BarcodeTag::new("MID001", "ACGAGTGCGT"),
//!     BarcodeTag::new("MID002", "ACGCTCGACA"),
//! ])
//! .unwrap();
//!
//! let readsets = vec![ReadsetDefinition::new("Sample1").with_mid5("MID001").with_mid3("MID002")];
//! let plan = ScanPlan::resolve(&catalog, &readsets, false).unwrap();
//! assert_eq!(plan.barcodes5.len(), 1);
//! assert_eq!(plan.barcodes3.len(), 1);
//! ```
//!
//! ## Barcode Tables
//!
//! Barcodes are loaded from a CSV or TSV table with a `name` and a `sequence`
//! column. Sequences are upper-cased and must consist of IUPAC nucleotide codes.

pub mod index;
pub mod store;
