use std::borrow::Cow;

use bio::alignment::distance::levenshtein;

use crate::core::tag::BarcodeTag;
use crate::core::types::MoleculeEnd;

/// A read sequence oriented for scanning one end.
///
/// For the 5' end this is the read as-is. For the 3' end it is the reversed
/// read, so that both ends are scanned from index 0 outwards.
#[derive(Debug, Clone)]
pub struct OrientedRead<'r> {
    end: MoleculeEnd,
    bases: Cow<'r, [u8]>,
}

impl<'r> OrientedRead<'r> {
    pub fn new(sequence: &'r [u8], end: MoleculeEnd) -> Self {
        let bases = match end {
            MoleculeEnd::FivePrime => Cow::Borrowed(sequence),
            MoleculeEnd::ThreePrime => Cow::Owned(sequence.iter().rev().copied().collect()),
        };
        Self { end, bases }
    }

    pub fn end(&self) -> MoleculeEnd {
        self.end
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// Result of comparing one barcode against one window of a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score<'s> {
    /// Levenshtein distance between `barcode` and `target`
    pub edit_distance: usize,

    /// Barcode bases compared (shortened by the deletion count for negative offsets)
    pub barcode: &'s [u8],

    /// Read bases compared, in scan orientation
    pub target: &'s [u8],

    /// First base after the barcode (0-based), 5' only
    pub start: Option<usize>,

    /// End of the insert (exclusive), 3' only
    pub stop: Option<usize>,
}

/// Compare `tag` against the window of `read` selected by `offset`.
///
/// A non-negative offset skips that many read bases before the barcode window.
/// A negative offset models a truncated barcode: `-offset` leading barcode
/// bases are dropped and the remainder is compared against the start of the read.
///
/// Returns `None` if the window would run past the end of the read, or if the
/// deletion count consumes the entire barcode.
#[must_use]
pub fn score<'s>(read: &'s OrientedRead<'_>, tag: &'s BarcodeTag, offset: isize) -> Option<Score<'s>> {
    let probe = tag.probe(read.end);

    let (barcode, window_start) = if offset >= 0 {
        (probe, offset.unsigned_abs())
    } else {
        let deletions = offset.unsigned_abs();
        if deletions >= probe.len() {
            return None;
        }
        (&probe[deletions..], 0)
    };

    let window_end = window_start.checked_add(barcode.len())?;
    let target = read.bases.get(window_start..window_end)?;

    let edit_distance = levenshtein(barcode, target) as usize;

    // window_end == barcode length + max(offset, 0)
    let (start, stop) = match read.end {
        MoleculeEnd::FivePrime => (Some(window_end), None),
        MoleculeEnd::ThreePrime => (None, Some(read.len() - window_end)),
    };

    Some(Score {
        edit_distance,
        barcode,
        target,
        start,
        stop,
    })
}
