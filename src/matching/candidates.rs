use std::collections::BTreeMap;

use crate::core::tag::BarcodeTag;
use crate::core::types::MoleculeEnd;

/// A barcode found at one end of a read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub tag: &'a BarcodeTag,
    pub end: MoleculeEnd,
    pub edit_distance: usize,
    pub offset: isize,

    /// First base after a 5' barcode (0-based)
    pub start: Option<usize>,

    /// End of the insert before a 3' barcode (exclusive, i.e. 1-based last base)
    pub stop: Option<usize>,
}

impl<'a> Match<'a> {
    pub fn barcode_name(&self) -> &'a str {
        self.tag.name()
    }

    /// 0-based trim start, 0 when this match carries no start
    pub fn start_or_default(&self) -> usize {
        self.start.unwrap_or(0)
    }

    /// Exclusive trim stop, `read_len` when this match carries no stop
    pub fn stop_or(&self, read_len: usize) -> usize {
        self.stop.unwrap_or(read_len)
    }

    /// Drop trim coordinates, for barcodes that are not part of the read body
    #[must_use]
    pub fn without_trim(mut self) -> Self {
        self.start = None;
        self.stop = None;
        self
    }
}

/// A qualifying match plus the bases that were compared to find it
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub hit: Match<'a>,
    pub barcode_seq: String,
    pub target_seq: String,
}

/// Qualifying matches for one end of one read, grouped by edit distance
#[derive(Debug, Default)]
pub struct CandidateSet<'a> {
    by_distance: BTreeMap<usize, BTreeMap<&'a str, Candidate<'a>>>,

    /// (distance, barcode name) in the order candidates were recorded
    discovered: Vec<(usize, &'a str)>,
}

impl<'a> CandidateSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a candidate. Within one distance the first match per barcode wins.
    ///
    /// Returns `true` if the candidate was recorded.
    pub fn insert(&mut self, candidate: Candidate<'a>) -> bool {
        let distance = candidate.hit.edit_distance;
        let name = candidate.hit.barcode_name();
        let tier = self.by_distance.entry(distance).or_default();
        if tier.contains_key(name) {
            return false;
        }
        tier.insert(name, candidate);
        self.discovered.push((distance, name));
        true
    }

    /// The group at the lowest edit distance present
    pub fn best_tier(&self) -> Option<(usize, &BTreeMap<&'a str, Candidate<'a>>)> {
        self.by_distance.iter().next().map(|(d, tier)| (*d, tier))
    }

    /// Candidates in the order they were recorded
    pub fn discovered(&self) -> impl Iterator<Item = &Candidate<'a>> {
        self.discovered
            .iter()
            .filter_map(|(d, name)| self.by_distance.get(d).and_then(|tier| tier.get(name)))
    }

    /// Total number of recorded candidates across all distances
    pub fn len(&self) -> usize {
        self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_distance.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(tag: &BarcodeTag, edit_distance: usize, offset: isize) -> Candidate<'_> {
        Candidate {
            hit: Match {
                tag,
                end: MoleculeEnd::FivePrime,
                edit_distance,
                offset,
                start: Some(tag.len()),
                stop: None,
            },
            barcode_seq: tag.sequence().to_string(),
            target_seq: String::new(),
        }
    }

    #[test]
    fn test_first_match_per_name_wins() {
        let tag = BarcodeTag::new("A", "ACGT");
        let mut set = CandidateSet::new();
        assert!(set.insert(candidate(&tag, 1, 0)));
        assert!(!set.insert(candidate(&tag, 1, 2)));
        assert!(set.insert(candidate(&tag, 0, 1)));

        assert_eq!(set.len(), 2);
        let (distance, tier) = set.best_tier().unwrap();
        assert_eq!(distance, 0);
        assert_eq!(tier["A"].hit.offset, 1);
    }

    #[test]
    fn test_discovery_order_preserved() {
        let a = BarcodeTag::new("A", "ACGT");
        let b = BarcodeTag::new("B", "TTTT");
        let mut set = CandidateSet::new();
        set.insert(candidate(&b, 1, 0));
        set.insert(candidate(&a, 0, 0));

        let names: Vec<_> = set.discovered().map(|c| c.hit.barcode_name()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_match_defaults() {
        let tag = BarcodeTag::new("A", "ACGT");
        let hit = candidate(&tag, 0, 0).hit;
        assert_eq!(hit.start_or_default(), 4);
        assert_eq!(hit.stop_or(50), 50);

        let hit = hit.without_trim();
        assert_eq!(hit.start_or_default(), 0);
    }
}
