use std::collections::BTreeMap;

use crate::matching::candidates::{CandidateSet, Match};

/// Pick the single best match for one end.
///
/// Only the lowest edit distance present is considered. If exactly one
/// barcode sits at that distance it wins and its counter is incremented.
/// If several barcodes tie there, the end is a no-call: nothing is returned,
/// no counter changes, and worse distances are not consulted.
pub fn select_best<'a>(
    candidates: &CandidateSet<'a>,
    counters: &mut BTreeMap<String, u64>,
) -> Option<Match<'a>> {
    let (_, tier) = candidates.best_tier()?;
    if tier.len() != 1 {
        return None;
    }

    let best = tier.values().next()?.hit;
    *counters.entry(best.barcode_name().to_string()).or_default() += 1;
    Some(best)
}
