use serde::{Deserialize, Serialize};

use crate::core::tag::BarcodeTag;
use crate::core::types::MoleculeEnd;
use crate::matching::candidates::{Candidate, CandidateSet, Match};
use crate::matching::scoring::{score, OrientedRead};

/// Tolerances for finding a barcode at one end of a read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Maximum Levenshtein distance for a barcode to qualify (inclusive)
    pub max_edit_distance: usize,
    /// Maximum number of extra bases allowed between the read end and the barcode
    pub max_offset: usize,
    /// Maximum number of leading barcode bases allowed to be missing
    pub max_deletions: usize,
}

/// Searches one end of a read for barcodes
///
/// The search runs in up to three passes and stops as soon as one produces a
/// qualifying match:
///
/// 1. every barcode at offset 0;
/// 2. offsets `1..=max_offset`, stopping after the first offset that yields
///    anything (the nearest offset wins, even if a later one would score better);
/// 3. only if nothing was found, deletions `1..=max_deletions`, stopping at the
///    first deletion count that yields anything.
#[derive(Debug, Clone)]
pub struct EndMatcher {
    config: MatchingConfig,
}

impl EndMatcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Collect all qualifying matches of `barcodes` at `end` of `sequence`
    pub fn scan<'a>(
        &self,
        sequence: &[u8],
        end: MoleculeEnd,
        barcodes: &[&'a BarcodeTag],
    ) -> CandidateSet<'a> {
        let read = OrientedRead::new(sequence, end);
        let mut candidates = CandidateSet::new();

        self.scan_at(&read, barcodes, 0, &mut candidates);

        for offset in 1..=self.config.max_offset {
            self.scan_at(&read, barcodes, to_offset(offset), &mut candidates);
            if !candidates.is_empty() {
                break;
            }
        }

        if candidates.is_empty() {
            for deletions in 1..=self.config.max_deletions {
                self.scan_at(&read, barcodes, -to_offset(deletions), &mut candidates);
                if !candidates.is_empty() {
                    break;
                }
            }
        }

        candidates
    }

    fn scan_at<'a>(
        &self,
        read: &OrientedRead<'_>,
        barcodes: &[&'a BarcodeTag],
        offset: isize,
        candidates: &mut CandidateSet<'a>,
    ) {
        for &tag in barcodes {
            let Some(s) = score(read, tag, offset) else {
                continue;
            };
            if s.edit_distance > self.config.max_edit_distance {
                continue;
            }

            let hit = Match {
                tag,
                end: read.end(),
                edit_distance: s.edit_distance,
                offset,
                start: s.start,
                stop: s.stop,
            };
            candidates.insert(Candidate {
                hit,
                barcode_seq: String::from_utf8_lossy(s.barcode).into_owned(),
                target_seq: String::from_utf8_lossy(s.target).into_owned(),
            });
        }
    }
}

#[allow(clippy::cast_possible_wrap)] // offsets are bounded by read length
fn to_offset(n: usize) -> isize {
    n as isize
}
