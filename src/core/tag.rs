use bio::alphabets::dna;
use serde::Serialize;

use crate::core::types::MoleculeEnd;

/// A named barcode (MID) sequence
///
/// The reverse complement and the 3' probe are derived once at construction
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarcodeTag {
    name: String,
    sequence: String,
    reverse_complement: String,

    /// `reverse(reverse_complement)`: the bases a 3' barcode presents when the
    /// read is walked backwards from its last base
    #[serde(skip)]
    three_prime_probe: String,
}

impl BarcodeTag {
    /// Create a tag, upper-casing the sequence.
    ///
    /// Sequence validity is checked by the catalog, not here.
    pub fn new(name: impl Into<String>, sequence: impl AsRef<str>) -> Self {
        let sequence = sequence.as_ref().trim().to_ascii_uppercase();
        let reverse_complement = reverse_complement(&sequence);
        let three_prime_probe = reverse_complement.chars().rev().collect();

        Self {
            name: name.into(),
            sequence,
            reverse_complement,
            three_prime_probe,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn reverse_complement(&self) -> &str {
        &self.reverse_complement
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The bases compared against the (possibly reversed) read for one end
    pub fn probe(&self, end: MoleculeEnd) -> &[u8] {
        match end {
            MoleculeEnd::FivePrime => self.sequence.as_bytes(),
            MoleculeEnd::ThreePrime => self.three_prime_probe.as_bytes(),
        }
    }
}

/// Reverse complement a nucleotide sequence using the IUPAC complement table.
///
/// A<->T, C<->G, R<->Y, K<->M, B<->V, D<->H; S, W and N are self-complementary.
/// Any other byte is passed through unchanged, so the operation is its own inverse.
#[must_use]
pub fn reverse_complement(sequence: &str) -> String {
    let rc = dna::revcomp(sequence.as_bytes());
    String::from_utf8_lossy(&rc).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement_basic() {
        assert_eq!(reverse_complement("ACGTTG"), "CAACGT");
        assert_eq!(reverse_complement("AAAA"), "TTTT");
        assert_eq!(reverse_complement(""), "");
    }

    #[test]
    fn test_reverse_complement_ambiguous_bases() {
        assert_eq!(reverse_complement("N"), "N");
        assert_eq!(reverse_complement("RYKM"), "KMRY");
        assert_eq!(reverse_complement("SWBVDH"), "DHBVWS");
    }

    #[test]
    fn test_reverse_complement_is_involution() {
        for seq in ["ACGTACGTAC", "NNACGTRYKM", "TTTTGGGGCCCCAAAA", "BDHVSWN"] {
            assert_eq!(reverse_complement(&reverse_complement(seq)), seq);
        }
    }

    #[test]
    fn test_tag_new_uppercases_and_derives() {
        let tag = BarcodeTag::new("MID001", " acgtacgtct ");
        assert_eq!(tag.name(), "MID001");
        assert_eq!(tag.sequence(), "ACGTACGTCT");
        assert_eq!(tag.reverse_complement(), "AGACGTACGT");
        assert_eq!(tag.len(), 10);
    }

    #[test]
    fn test_three_prime_probe_is_complement() {
        let tag = BarcodeTag::new("t", "AACG");
        assert_eq!(tag.probe(MoleculeEnd::FivePrime), b"AACG");
        // reverse(revcomp(AACG)) = reverse(CGTT) = TTGC
        assert_eq!(tag.probe(MoleculeEnd::ThreePrime), b"TTGC");
    }
}
