//! Core data types for barcode demultiplexing.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`BarcodeTag`]: A named barcode sequence with its precomputed reverse complement
//! - [`ReadsetDefinition`]: A sample defined by its expected 5' and/or 3' barcodes
//! - [`Read`]: A single sequencing read (header, sequence, quality)
//! - [`MoleculeEnd`]: Which end of the molecule a barcode is searched at
//!
//! ## Orientation
//!
//! Barcodes are always written 5' to 3' on the strand they were synthesized on.
//! A 5' barcode is read directly at the start of a read. A 3' barcode is read
//! through at the tail of the read, so the read carries its reverse complement:
//!
//! | End | Compared sequence         | Compared against       |
//! |-----|---------------------------|------------------------|
//! | 5'  | barcode                   | read prefix            |
//! | 3'  | reverse(revcomp(barcode)) | reverse(read) prefix   |

pub mod read;
pub mod readset;
pub mod tag;
pub mod types;
