use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fastq;

use crate::core::read::Read;
use crate::parsing::tables::ParseError;

/// Whether a path names a gzip file, judged by its `.gz` extension
pub fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Streaming FASTQ reader yielding one [`Read`] at a time
pub struct FastqReader {
    inner: fastq::io::Reader<Box<dyn BufRead>>,
    record: fastq::Record,
    records_read: u64,
}

impl FastqReader {
    pub fn new(inner: Box<dyn BufRead>) -> Self {
        Self {
            inner: fastq::io::Reader::new(inner),
            record: fastq::Record::default(),
            records_read: 0,
        }
    }

    /// Open a plain or gzip-compressed FASTQ file
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        let inner: Box<dyn BufRead> = if is_gzipped(path) {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self::new(inner))
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    fn next_read(&mut self) -> Result<Option<Read>, ParseError> {
        if self.inner.read_record(&mut self.record)? == 0 {
            return Ok(None);
        }
        self.records_read += 1;

        let sequence = self.record.sequence();
        let quality = self.record.quality_scores();
        if sequence.len() != quality.len() {
            return Err(ParseError::InvalidFormat(format!(
                "FASTQ record {} has {} bases but {} quality scores",
                self.records_read,
                sequence.len(),
                quality.len()
            )));
        }

        let name = String::from_utf8_lossy(self.record.name());
        let description = String::from_utf8_lossy(self.record.description());
        let header = if description.is_empty() {
            name.into_owned()
        } else {
            format!("{name} {description}")
        };

        Ok(Some(Read::new(header, sequence.to_vec(), quality.to_vec())))
    }
}

impl Iterator for FastqReader {
    type Item = Result<Read, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_read().transpose()
    }
}

/// Convert a read into a noodles record for writing
///
/// The whole header goes into the record name so the description is written
/// back unchanged.
pub fn to_record(read: &Read) -> fastq::Record {
    fastq::Record::new(
        fastq::record::Definition::new(read.header.as_str(), ""),
        read.sequence.clone(),
        read.quality.clone(),
    )
}
