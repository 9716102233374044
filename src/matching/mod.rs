//! Barcode matching and read classification.
//!
//! Matching one read happens in stages:
//!
//! 1. [`scoring`]: edit distance of one barcode against one end of the read at a
//!    given offset (positive = skipped read bases, negative = missing barcode bases)
//! 2. [`engine`]: the greedy offset/deletion search across all candidate barcodes
//! 3. [`selection`]: reduce the candidates of one end to a single call, or none on a tie
//! 4. [`classify`]: map the 5' and 3' calls onto readsets
//!
//! When the barcodes were already called by the sequencer, [`header`] reads them
//! from the read name instead of the read body.

pub mod candidates;
pub mod classify;
pub mod engine;
pub mod header;
pub mod scoring;
pub mod selection;

pub use candidates::{Candidate, CandidateSet, Match};
pub use classify::{classify, classify_pair, other_match_label, Classification};
pub use engine::{EndMatcher, MatchingConfig};
pub use selection::select_best;
