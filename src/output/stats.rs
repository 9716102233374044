use std::collections::BTreeMap;
use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counts accumulated over one demultiplexing run
///
/// All maps are keyed by name and therefore report in sorted order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Reads processed (first mates only for paired input)
    pub total_reads: u64,

    /// Reads skipped in header mode because no barcodes could be read from the header
    pub malformed_headers: u64,

    pub match5_counts: BTreeMap<String, u64>,
    pub match3_counts: BTreeMap<String, u64>,
    pub readset_counts: BTreeMap<String, u64>,

    /// Reads matching no readset, by the barcodes that were called
    pub other_match_counts: BTreeMap<String, u64>,

    /// Records written per output file name
    pub bucket_counts: BTreeMap<String, u64>,
}

fn bump(map: &mut BTreeMap<String, u64>, key: &str) {
    if let Some(count) = map.get_mut(key) {
        *count += 1;
    } else {
        map.insert(key.to_string(), 1);
    }
}

#[allow(clippy::cast_precision_loss)] // percentages for display only
fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_readset(&mut self, name: &str) {
        bump(&mut self.readset_counts, name);
    }

    pub fn record_other_match(&mut self, label: &str) {
        bump(&mut self.other_match_counts, label);
    }

    pub fn record_bucket(&mut self, file_name: &str) {
        bump(&mut self.bucket_counts, file_name);
    }

    /// Sum of records written across all buckets
    pub fn records_written(&self) -> u64 {
        self.bucket_counts.values().sum()
    }

    /// Human-readable report
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `w`.
    pub fn write_text<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "Total reads: {}", self.total_reads)?;
        if self.malformed_headers > 0 {
            writeln!(w, "Reads with malformed headers: {}", self.malformed_headers)?;
        }

        writeln!(w, "5' Match Summary:")?;
        write_plain_section(w, &self.match5_counts)?;

        writeln!(w, "3' Match Summary:")?;
        write_plain_section(w, &self.match3_counts)?;

        writeln!(w, "Readset Match Summary:")?;
        self.write_percent_section(w, &self.readset_counts)?;

        if !self.other_match_counts.is_empty() {
            writeln!(w, "Reads Not Matching A Readset:")?;
            self.write_percent_section(w, &self.other_match_counts)?;
        }

        writeln!(w, "Output Files:")?;
        write_plain_section(w, &self.bucket_counts)
    }

    fn write_percent_section<W: Write>(&self, w: &mut W, counts: &BTreeMap<String, u64>) -> io::Result<()> {
        if counts.is_empty() {
            return writeln!(w, "\tNo matches found");
        }
        for (key, count) in counts {
            writeln!(w, "\t{key}: {count} ({:.2}%)", percent(*count, self.total_reads))?;
        }
        Ok(())
    }

    /// One row per counter: `category`, `key`, `count`
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `w`.
    pub fn write_tsv<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "category\tkey\tcount")?;
        writeln!(w, "total\treads\t{}", self.total_reads)?;
        writeln!(w, "total\tmalformed_headers\t{}", self.malformed_headers)?;

        let sections = [
            ("match5", &self.match5_counts),
            ("match3", &self.match3_counts),
            ("readset", &self.readset_counts),
            ("other_match", &self.other_match_counts),
            ("bucket", &self.bucket_counts),
        ];
        for (category, counts) in sections {
            for (key, count) in counts {
                writeln!(w, "{category}\t{key}\t{count}")?;
            }
        }
        Ok(())
    }

    /// JSON report stamped with the time it was generated
    pub fn to_json(&self, generated_at: DateTime<Utc>) -> serde_json::Value {
        serde_json::json!({
            "generated_at": generated_at.to_rfc3339(),
            "statistics": self,
        })
    }
}

fn write_plain_section<W: Write>(w: &mut W, counts: &BTreeMap<String, u64>) -> io::Result<()> {
    if counts.is_empty() {
        return writeln!(w, "\tNo matches found");
    }
    for (key, count) in counts {
        writeln!(w, "\t{key}: {count}")?;
    }
    Ok(())
}
