use std::io::Read as IoRead;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::core::readset::ReadsetDefinition;
use crate::core::tag::BarcodeTag;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Deserialize)]
struct BarcodeRow {
    #[serde(alias = "Name", alias = "tag_name")]
    name: String,
    #[serde(alias = "Sequence", alias = "seq")]
    sequence: String,
}

/// Pick the field delimiter from the file extension: `.csv` is comma, anything else tab
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase) {
        Some(ext) if ext == "csv" => b',',
        _ => b'\t',
    }
}

fn table_reader<R: IoRead>(rdr: R, delimiter: u8) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(rdr)
}

/// Parse a barcode table with `name` and `sequence` columns
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::Csv` / `ParseError::InvalidFormat` if the content is invalid.
pub fn parse_barcode_file(path: &Path) -> Result<Vec<BarcodeTag>, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_barcode_table(file, delimiter_for(path))
}

/// Parse barcode table text
///
/// # Errors
///
/// Returns `ParseError::Csv` if a row cannot be deserialized, or
/// `ParseError::InvalidFormat` if the table has no rows.
pub fn parse_barcode_text(text: &str, delimiter: u8) -> Result<Vec<BarcodeTag>, ParseError> {
    parse_barcode_table(text.as_bytes(), delimiter)
}

fn parse_barcode_table<R: IoRead>(rdr: R, delimiter: u8) -> Result<Vec<BarcodeTag>, ParseError> {
    let mut tags = Vec::new();
    for row in table_reader(rdr, delimiter).deserialize() {
        let row: BarcodeRow = row?;
        tags.push(BarcodeTag::new(row.name, row.sequence));
    }

    if tags.is_empty() {
        return Err(ParseError::InvalidFormat("No barcodes found in table".to_string()));
    }
    Ok(tags)
}

/// Parse a readset table with `name`, `mid5` and `mid3` columns; empty cells mean unset
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::Csv` / `ParseError::InvalidFormat` if the content is invalid.
pub fn parse_readset_file(path: &Path) -> Result<Vec<ReadsetDefinition>, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_readset_table(file, delimiter_for(path))
}

/// Parse readset table text
///
/// # Errors
///
/// Returns `ParseError::Csv` if a row cannot be deserialized, or
/// `ParseError::InvalidFormat` if the table has no rows.
pub fn parse_readset_text(text: &str, delimiter: u8) -> Result<Vec<ReadsetDefinition>, ParseError> {
    parse_readset_table(text.as_bytes(), delimiter)
}

fn parse_readset_table<R: IoRead>(rdr: R, delimiter: u8) -> Result<Vec<ReadsetDefinition>, ParseError> {
    let mut readsets = Vec::new();
    for row in table_reader(rdr, delimiter).deserialize() {
        let readset: ReadsetDefinition = row?;
        readsets.push(readset.normalized());
    }

    if readsets.is_empty() {
        return Err(ParseError::InvalidFormat("No readsets found in table".to_string()));
    }
    Ok(readsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_barcode_tsv() {
        let tsv = "name\tsequence\nMID001\tacgagtgcgt\nMID002\t ACGCTCGACA \n";
        let tags = parse_barcode_text(tsv, b'\t').unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name(), "MID001");
        assert_eq!(tags[0].sequence(), "ACGAGTGCGT");
        assert_eq!(tags[1].sequence(), "ACGCTCGACA");
    }

    #[test]
    fn test_parse_barcode_csv_with_comments() {
        let csv = "# barcode kit v2\nname,sequence\nMID001,ACGAGTGCGT\n";
        let tags = parse_barcode_text(csv, b',').unwrap();
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_parse_barcode_empty_table() {
        assert!(matches!(
            parse_barcode_text("name\tsequence\n", b'\t'),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_barcode_missing_column() {
        assert!(matches!(
            parse_barcode_text("name\nMID001\n", b'\t'),
            Err(ParseError::Csv(_))
        ));
    }

    #[test]
    fn test_parse_readsets_blank_cells_are_unset() {
        let tsv = "name\tmid5\tmid3\nS1\tMID001\t\nS2\tMID001\tMID002\nS3\t \tMID003\n";
        let readsets = parse_readset_text(tsv, b'\t').unwrap();
        assert_eq!(readsets.len(), 3);
        assert_eq!(readsets[0].mid5.as_deref(), Some("MID001"));
        assert_eq!(readsets[0].mid3, None);
        assert_eq!(readsets[1].mid3.as_deref(), Some("MID002"));
        assert_eq!(readsets[2].mid5, None);
        assert_eq!(readsets[2].mid3.as_deref(), Some("MID003"));
    }

    #[test]
    fn test_parse_readsets_without_mid3_column() {
        let csv = "name,mid5\nS1,MID001\n";
        let readsets = parse_readset_text(csv, b',').unwrap();
        assert_eq!(readsets[0].mid5.as_deref(), Some("MID001"));
        assert_eq!(readsets[0].mid3, None);
    }

    #[test]
    fn test_delimiter_for() {
        assert_eq!(delimiter_for(Path::new("barcodes.csv")), b',');
        assert_eq!(delimiter_for(Path::new("barcodes.CSV")), b',');
        assert_eq!(delimiter_for(Path::new("barcodes.tsv")), b'\t');
        assert_eq!(delimiter_for(Path::new("barcodes")), b'\t');
    }
}
