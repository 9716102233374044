//! Centralized validation and helper functions.

use std::path::{Path, PathBuf};

/// IUPAC nucleotide codes accepted in barcode sequences
pub const IUPAC_BASES: &[u8] = b"ACGTNRYSWKMBDHV";

/// Validate that a string is a non-empty upper-case IUPAC nucleotide sequence.
///
/// # Examples
///
/// ```
/// use barcoder::utils::validation::is_valid_barcode_sequence;
///
/// assert!(is_valid_barcode_sequence("ACGTNRY"));
/// assert!(!is_valid_barcode_sequence("acgt"));
/// assert!(!is_valid_barcode_sequence("ACGU"));
/// assert!(!is_valid_barcode_sequence(""));
/// ```
#[must_use]
pub fn is_valid_barcode_sequence(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| IUPAC_BASES.contains(&b))
}

/// Basename of an input file: the file name with a trailing `.gz` and then
/// the final extension removed.
///
/// # Examples
///
/// ```
/// use barcoder::utils::validation::input_basename;
/// use std::path::Path;
///
/// assert_eq!(input_basename(Path::new("/data/lane1.fastq.gz")), "lane1");
/// assert_eq!(input_basename(Path::new("lane1.fq")), "lane1");
/// assert_eq!(input_basename(Path::new("sample.R1.fastq")), "sample.R1");
/// ```
#[must_use]
pub fn input_basename(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = strip_suffix_ignore_case(&name, ".gz").unwrap_or(&name);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    if s.is_char_boundary(split) && s[split..].eq_ignore_ascii_case(suffix) {
        Some(&s[..split])
    } else {
        None
    }
}

/// Directory outputs go to when none is given: the parent of the first input
#[must_use]
pub fn default_output_dir(first_input: &Path) -> PathBuf {
    match first_input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
