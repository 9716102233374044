use std::io;
use std::path::{Path, PathBuf};

use crate::core::read::Read;
use crate::core::readset::ReadsetDefinition;
use crate::matching::candidates::{CandidateSet, Match};
use crate::output::sink::{suffix, OutputSink};

const DETAIL_COLUMNS: [&str; 9] = [
    "Readname",
    "Barcode",
    "End of Molecule",
    "Edit Distance",
    "Offset",
    "Start",
    "Stop",
    "Barcode Sequence",
    "Target Sequence",
];

const SUMMARY_COLUMNS: [&str; 11] = [
    "Readname",
    "Readset",
    "5' Barcode",
    "3' Barcode",
    "5' Edit Distance",
    "3' Edit Distance",
    "Start",
    "Stop",
    "Original Length",
    "Final Length",
    "Trimmed Sequence",
];

/// Path of the per-candidate log for inputs named `basename`
pub fn detail_log_path(dir: &Path, basename: &str, compress: bool) -> PathBuf {
    dir.join(format!("{basename}.barcode-detailed{}", suffix("txt", compress)))
}

/// Path of the per-record log for inputs named `basename`
pub fn summary_log_path(dir: &Path, basename: &str, compress: bool) -> PathBuf {
    dir.join(format!("{basename}.barcode-summary{}", suffix("txt", compress)))
}

/// Tab-delimited, unquoted table written through an [`OutputSink`]
struct TableLog {
    path: PathBuf,
    writer: csv::Writer<OutputSink>,
}

impl TableLog {
    fn create(path: PathBuf, compress: bool, columns: &[&str]) -> io::Result<Self> {
        let sink = OutputSink::create(&path, compress)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(sink);
        writer.write_record(columns).map_err(io::Error::from)?;
        Ok(Self { path, writer })
    }

    fn write_row(&mut self, row: &[String]) -> io::Result<()> {
        self.writer.write_record(row).map_err(io::Error::from)
    }

    fn finish(self) -> io::Result<PathBuf> {
        let mut sink = self.writer.into_inner().map_err(|e| e.into_error())?;
        sink.try_finish()?;
        Ok(self.path)
    }
}

/// One row per qualifying candidate, in the order candidates were found
pub struct DetailLog(TableLog);

impl DetailLog {
    /// Create the log and write its header row
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn create(path: PathBuf, compress: bool) -> io::Result<Self> {
        TableLog::create(path, compress, &DETAIL_COLUMNS).map(Self)
    }

    /// Log every candidate found at one end of `read`
    ///
    /// # Errors
    ///
    /// Returns any error from writing the rows.
    pub fn write_candidates(&mut self, read: &Read, candidates: &CandidateSet<'_>) -> io::Result<()> {
        for candidate in candidates.discovered() {
            let hit = &candidate.hit;
            self.0.write_row(&[
                read.header.clone(),
                hit.barcode_name().to_string(),
                hit.end.to_string(),
                hit.edit_distance.to_string(),
                hit.offset.to_string(),
                (hit.start_or_default() + 1).to_string(),
                hit.stop_or(read.len()).to_string(),
                candidate.barcode_seq.clone(),
                candidate.target_seq.clone(),
            ])?;
        }
        Ok(())
    }

    /// Flush and close, returning the log path
    ///
    /// # Errors
    ///
    /// Returns any error from the final flush.
    pub fn finish(self) -> io::Result<PathBuf> {
        self.0.finish()
    }
}

/// Everything the summary log records about one emitted record
pub struct SummaryRow<'a> {
    pub original: &'a Read,
    pub trimmed: &'a Read,
    pub readset: Option<&'a ReadsetDefinition>,
    pub match5: Option<&'a Match<'a>>,
    pub match3: Option<&'a Match<'a>>,

    /// 0-based trim start
    pub start: usize,

    /// Exclusive trim stop
    pub stop: usize,
}

/// One row per emitted record
pub struct SummaryLog(TableLog);

impl SummaryLog {
    /// Create the log and write its header row
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn create(path: PathBuf, compress: bool) -> io::Result<Self> {
        TableLog::create(path, compress, &SUMMARY_COLUMNS).map(Self)
    }

    /// # Errors
    ///
    /// Returns any error from writing the row.
    pub fn write(&mut self, row: &SummaryRow<'_>) -> io::Result<()> {
        let name = |m: Option<&Match<'_>>| m.map(|m| m.barcode_name().to_string()).unwrap_or_default();
        let distance = |m: Option<&Match<'_>>| m.map(|m| m.edit_distance.to_string()).unwrap_or_default();

        self.0.write_row(&[
            row.original.header.clone(),
            row.readset.map(|rs| rs.name.clone()).unwrap_or_default(),
            name(row.match5),
            name(row.match3),
            distance(row.match5),
            distance(row.match3),
            (row.start + 1).to_string(),
            row.stop.to_string(),
            row.original.len().to_string(),
            row.trimmed.len().to_string(),
            String::from_utf8_lossy(&row.trimmed.sequence).into_owned(),
        ])
    }

    /// Flush and close, returning the log path
    ///
    /// # Errors
    ///
    /// Returns any error from the final flush.
    pub fn finish(self) -> io::Result<PathBuf> {
        self.0.finish()
    }
}
