//! The demultiplexing run.
//!
//! A [`Demultiplexer`] is built once from a barcode catalog, the readsets to
//! separate and the [`RunParameters`]. Building it validates the configuration;
//! [`Demultiplexer::run`] then streams each input (and its mate, for paired
//! data) one read at a time:
//!
//! ```text
//! read -> scan 5' -> scan 3' -> select best per end -> classify -> trim -> write
//! ```
//!
//! Everything a run produces (open buckets, logs, counters) is owned by that
//! run and released when it ends, whether it succeeds or fails.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::catalog::index::{ConfigError, ScanPlan};
use crate::catalog::store::BarcodeCatalog;
use crate::core::read::Read;
use crate::core::readset::ReadsetDefinition;
use crate::core::tag::BarcodeTag;
use crate::core::types::MoleculeEnd;
use crate::matching::candidates::{CandidateSet, Match};
use crate::matching::classify::{classify, classify_pair, other_match_label};
use crate::matching::engine::{EndMatcher, MatchingConfig};
use crate::matching::header::extract_header_barcodes;
use crate::matching::selection::select_best;
use crate::output::emitter::Emitter;
use crate::output::logs::{detail_log_path, summary_log_path, DetailLog, SummaryLog, SummaryRow};
use crate::output::stats::RunStatistics;
use crate::parsing::fastq::FastqReader;
use crate::parsing::tables::ParseError;
use crate::utils::validation::input_basename;

/// Reads between progress messages
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// Options for one demultiplexing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParameters {
    pub matching: MatchingConfig,

    /// Take barcodes from the read header instead of the read sequence
    pub barcodes_in_header: bool,

    /// Try every catalog barcode at both ends, not just those readsets name
    pub scan_all_barcodes_both_ends: bool,

    pub enable_detail_log: bool,
    pub enable_summary_log: bool,

    /// Gzip the FASTQ buckets and logs
    pub compress_output: bool,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            matching: MatchingConfig::default(),
            barcodes_in_header: false,
            scan_all_barcodes_both_ends: false,
            enable_detail_log: false,
            enable_summary_log: true,
            compress_output: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum DemuxError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Second FASTQ has fewer records than the primary FASTQ: {} ended after {records} records", .mate.display())]
    MateTooShort { mate: PathBuf, records: u64 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub statistics: RunStatistics,

    /// FASTQ buckets written, in sorted order
    pub outputs: Vec<PathBuf>,

    pub detail_log: Option<PathBuf>,
    pub summary_log: Option<PathBuf>,
}

/// Outputs and counters owned by one run
struct RunState {
    stats: RunStatistics,
    emitter: Emitter,
    detail: Option<DetailLog>,
    summary: Option<SummaryLog>,
}

/// Where one record goes and the calls that sent it there
struct Routing<'r, 'c> {
    readset: Option<&'r ReadsetDefinition>,
    match5: Option<Match<'c>>,
    match3: Option<Match<'c>>,
}

/// Splits FASTQ input into per-readset outputs by barcode
pub struct Demultiplexer<'c> {
    readsets: &'c [ReadsetDefinition],
    plan: ScanPlan<'c>,
    matcher: EndMatcher,
    params: RunParameters,
}

impl<'c> Demultiplexer<'c> {
    /// Validate the readsets against the catalog and prepare the scan
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a readset names an unknown barcode or no
    /// barcode at all.
    pub fn new(
        catalog: &'c BarcodeCatalog,
        readsets: &'c [ReadsetDefinition],
        params: RunParameters,
    ) -> Result<Self, ConfigError> {
        let plan = ScanPlan::resolve(catalog, readsets, params.scan_all_barcodes_both_ends)?;

        let m = &params.matching;
        info!("Scanning reads for barcodes");
        info!("  Mismatches tolerated: {}", m.max_edit_distance);
        info!("  Barcode can be within {} bases of the read end", m.max_offset);
        info!("  Deletions tolerated (partial barcodes): {}", m.max_deletions);
        if params.barcodes_in_header {
            info!("  Barcodes are read from the read header, assuming they were called upstream");
        }
        info!("  Readsets:");
        for readset in readsets {
            info!("    {readset}");
        }
        info!("  Will scan for a total of {} barcodes", plan.distinct_barcodes());

        Ok(Self {
            readsets,
            plan,
            matcher: EndMatcher::new(params.matching),
            params,
        })
    }

    pub fn params(&self) -> &RunParameters {
        &self.params
    }

    /// Demultiplex `inputs` into `output_dir`.
    ///
    /// When `mates` is non-empty it must pair one-to-one with `inputs`, and
    /// each input is processed together with its mate. Logs are named after
    /// the first input.
    ///
    /// # Errors
    ///
    /// Returns `DemuxError::Config` for empty or mismatched input lists,
    /// `DemuxError::Input` for unreadable or malformed FASTQ,
    /// `DemuxError::MateTooShort` if a mate file runs out of records, and
    /// `DemuxError::Io` if an output cannot be written.
    pub fn run(&self, inputs: &[PathBuf], mates: &[PathBuf], output_dir: &Path) -> Result<RunOutcome, DemuxError> {
        let Some(first) = inputs.first() else {
            return Err(ConfigError::NoInputs.into());
        };
        if !mates.is_empty() && mates.len() != inputs.len() {
            return Err(ConfigError::MateCountMismatch {
                inputs: inputs.len(),
                mates: mates.len(),
            }
            .into());
        }

        std::fs::create_dir_all(output_dir)?;
        let log_basename = input_basename(first);
        let compress = self.params.compress_output;

        let mut state = RunState {
            stats: RunStatistics::new(),
            emitter: Emitter::new(output_dir, compress),
            detail: self
                .params
                .enable_detail_log
                .then(|| DetailLog::create(detail_log_path(output_dir, &log_basename, compress), compress))
                .transpose()?,
            summary: self
                .params
                .enable_summary_log
                .then(|| SummaryLog::create(summary_log_path(output_dir, &log_basename, compress), compress))
                .transpose()?,
        };

        for (i, input) in inputs.iter().enumerate() {
            match mates.get(i) {
                Some(mate) => self.run_pair(input, mate, &mut state)?,
                None => self.run_single(input, &mut state)?,
            }
        }

        let RunState {
            stats,
            emitter,
            detail,
            summary,
        } = state;
        if emitter.is_empty() {
            warn!("No reads found in the input; no outputs written");
        } else {
            info!("Closing {} output files", emitter.len());
        }
        let outputs = emitter.finish()?;
        let detail_log = detail.map(DetailLog::finish).transpose()?;
        let summary_log = summary.map(SummaryLog::finish).transpose()?;

        Ok(RunOutcome {
            statistics: stats,
            outputs,
            detail_log,
            summary_log,
        })
    }

    fn run_single(&self, input: &Path, state: &mut RunState) -> Result<(), DemuxError> {
        info!("Processing file: {}", input.display());
        let input_error = |source| DemuxError::Input {
            path: input.to_path_buf(),
            source,
        };

        let basename = input_basename(input);
        let mut count = 0u64;
        for read in FastqReader::open(input).map_err(input_error)? {
            let read = read.map_err(input_error)?;
            count += 1;
            log_progress(count);
            self.process_read(&read, &basename, state)?;
        }

        info!("Finished {count} reads");
        Ok(())
    }

    fn run_pair(&self, input: &Path, mate: &Path, state: &mut RunState) -> Result<(), DemuxError> {
        info!("Processing files: {} and {}", input.display(), mate.display());
        let input_error = |source| DemuxError::Input {
            path: input.to_path_buf(),
            source,
        };
        let mate_error = |source| DemuxError::Input {
            path: mate.to_path_buf(),
            source,
        };

        let basename1 = input_basename(input);
        let basename2 = input_basename(mate);
        let mut mates = FastqReader::open(mate).map_err(mate_error)?;

        let mut count = 0u64;
        for read1 in FastqReader::open(input).map_err(input_error)? {
            let read1 = read1.map_err(input_error)?;
            let Some(read2) = mates.next() else {
                return Err(DemuxError::MateTooShort {
                    mate: mate.to_path_buf(),
                    records: mates.records_read(),
                });
            };
            let read2 = read2.map_err(mate_error)?;

            count += 1;
            log_progress(count);
            self.process_pair(&read1, &read2, &basename1, &basename2, state)?;
        }

        if mates.next().is_some() {
            warn!("{} has more records than {}; extra mates ignored", mate.display(), input.display());
        }
        info!("Finished {count} read pairs");
        Ok(())
    }

    /// Route one single-end read to every readset it matches
    fn process_read(&self, read: &Read, basename: &str, state: &mut RunState) -> Result<(), DemuxError> {
        state.stats.total_reads += 1;
        let (match5, match3) = self.call_ends(read, &self.plan.barcodes5, &self.plan.barcodes3, state)?;

        let classification = classify(match5.as_ref(), match3.as_ref(), self.readsets);
        if classification.is_unclassified() {
            let routing = Routing {
                readset: None,
                match5,
                match3,
            };
            return self.emit(read, basename, &routing, true, state);
        }

        for readset in classification.readsets {
            let routing = Routing {
                readset: Some(readset),
                match5,
                match3,
            };
            self.emit(read, basename, &routing, true, state)?;
        }
        Ok(())
    }

    /// Route a mate pair to the single readset both mates agree on
    ///
    /// The second mate reads the molecule from its 3' end, so it is scanned
    /// with the 3' barcodes at its start and the 5' barcodes at its tail.
    fn process_pair(
        &self,
        read1: &Read,
        read2: &Read,
        basename1: &str,
        basename2: &str,
        state: &mut RunState,
    ) -> Result<(), DemuxError> {
        state.stats.total_reads += 1;
        let (forward5, forward3) = self.call_ends(read1, &self.plan.barcodes5, &self.plan.barcodes3, state)?;
        let (reverse5, reverse3) = self.call_ends(read2, &self.plan.barcodes3, &self.plan.barcodes5, state)?;

        let readset = classify_pair(forward5.as_ref(), reverse5.as_ref(), self.readsets);

        let forward = Routing {
            readset,
            match5: forward5,
            match3: forward3,
        };
        self.emit(read1, basename1, &forward, true, state)?;

        let reverse = Routing {
            readset,
            match5: reverse5,
            match3: reverse3,
        };
        self.emit(read2, basename2, &reverse, false, state)
    }

    /// Scan both ends of a read and reduce each to at most one call
    fn call_ends(
        &self,
        read: &Read,
        barcodes5: &[&'c BarcodeTag],
        barcodes3: &[&'c BarcodeTag],
        state: &mut RunState,
    ) -> io::Result<(Option<Match<'c>>, Option<Match<'c>>)> {
        let (set5, set3) = if self.params.barcodes_in_header {
            self.scan_header(read, barcodes5, barcodes3, &mut state.stats)
        } else {
            (
                self.matcher.scan(&read.sequence, MoleculeEnd::FivePrime, barcodes5),
                self.matcher.scan(&read.sequence, MoleculeEnd::ThreePrime, barcodes3),
            )
        };

        if let Some(log) = state.detail.as_mut() {
            log.write_candidates(read, &set5)?;
            log.write_candidates(read, &set3)?;
        }

        let mut match5 = select_best(&set5, &mut state.stats.match5_counts);
        let mut match3 = select_best(&set3, &mut state.stats.match3_counts);
        if self.params.barcodes_in_header {
            match5 = match5.map(Match::without_trim);
            match3 = match3.map(Match::without_trim);
        }
        debug!(
            "{}: 5' {}, 3' {}",
            read.header,
            describe_call(match5.as_ref()),
            describe_call(match3.as_ref())
        );
        Ok((match5, match3))
    }

    fn scan_header(
        &self,
        read: &Read,
        barcodes5: &[&'c BarcodeTag],
        barcodes3: &[&'c BarcodeTag],
        stats: &mut RunStatistics,
    ) -> (CandidateSet<'c>, CandidateSet<'c>) {
        let called = match extract_header_barcodes(&read.header) {
            Ok(called) => called,
            Err(e) => {
                error!("{e}");
                stats.malformed_headers += 1;
                return (CandidateSet::new(), CandidateSet::new());
            }
        };

        let five = called.five_prime.to_ascii_uppercase();
        let set5 = self.matcher.scan(five.as_bytes(), MoleculeEnd::FivePrime, barcodes5);
        let set3 = match called.three_prime {
            Some(three) => {
                let three = three.to_ascii_uppercase();
                self.matcher.scan(three.as_bytes(), MoleculeEnd::ThreePrime, barcodes3)
            }
            None => CandidateSet::new(),
        };
        (set5, set3)
    }

    /// Trim a read to its insert and write it to its bucket
    ///
    /// `counted` is false for second mates, whose pair is already counted
    /// through the first mate.
    fn emit(
        &self,
        read: &Read,
        basename: &str,
        routing: &Routing<'_, 'c>,
        counted: bool,
        state: &mut RunState,
    ) -> Result<(), DemuxError> {
        let match5 = routing.match5.as_ref();
        let match3 = routing.match3.as_ref();

        if counted {
            match routing.readset {
                Some(readset) => state.stats.record_readset(&readset.name),
                None => state.stats.record_other_match(&other_match_label(match5, match3)),
            }
        }

        let start = match5.map_or(0, Match::start_or_default);
        let stop = match3.map_or(read.len(), |m| m.stop_or(read.len()));
        let trimmed = read.slice(start, stop);

        let path = state.emitter.bucket_path(basename, routing.readset);
        state.emitter.write(&path, &trimmed)?;
        if let Some(name) = path.file_name() {
            state.stats.record_bucket(&name.to_string_lossy());
        }

        if let Some(log) = state.summary.as_mut() {
            log.write(&SummaryRow {
                original: read,
                trimmed: &trimmed,
                readset: routing.readset,
                match5,
                match3,
                start,
                stop,
            })?;
        }
        Ok(())
    }
}

/// One end's call for the debug log
fn describe_call(hit: Option<&Match<'_>>) -> String {
    match hit {
        Some(m) => format!("{} (edit distance {}, offset {})", m.barcode_name(), m.edit_distance, m.offset),
        None => "none".to_string(),
    }
}

fn log_progress(count: u64) {
    if count % PROGRESS_INTERVAL == 0 {
        info!("  processed {count} reads");
    }
}
