use crate::core::readset::ReadsetDefinition;
use crate::matching::candidates::Match;

/// Readsets a single-end read was assigned to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'r> {
    pub readsets: Vec<&'r ReadsetDefinition>,
}

impl Classification<'_> {
    /// No readset matched, so the read belongs in the unknowns bucket
    pub fn is_unclassified(&self) -> bool {
        self.readsets.is_empty()
    }
}

fn mid_agrees(expected: Option<&str>, called: Option<&Match<'_>>) -> bool {
    match expected {
        None => true,
        Some(name) => called.is_some_and(|m| m.barcode_name() == name),
    }
}

/// Stricter agreement used for mate pairs: an unset MID requires no call
fn mid_agrees_strict(expected: Option<&str>, called: Option<&Match<'_>>) -> bool {
    match (expected, called) {
        (None, None) => true,
        (Some(name), Some(m)) => m.barcode_name() == name,
        _ => false,
    }
}

/// Assign a read to every readset whose barcodes it carries.
///
/// A readset matches when each MID it sets equals the barcode called at that
/// end; an unset MID matches anything. A read may match several readsets and
/// is then written to all of them.
pub fn classify<'r>(
    match5: Option<&Match<'_>>,
    match3: Option<&Match<'_>>,
    readsets: &'r [ReadsetDefinition],
) -> Classification<'r> {
    let readsets = readsets
        .iter()
        .filter(|rs| mid_agrees(rs.mid5.as_deref(), match5) && mid_agrees(rs.mid3.as_deref(), match3))
        .collect();
    Classification { readsets }
}

/// Assign a mate pair to a readset.
///
/// `forward5` is the 5' call on the first mate and `reverse5` the 5' call on
/// the second mate, which carries the readset's 3' barcode. The pair is only
/// assigned when exactly one readset agrees on both.
pub fn classify_pair<'r>(
    forward5: Option<&Match<'_>>,
    reverse5: Option<&Match<'_>>,
    readsets: &'r [ReadsetDefinition],
) -> Option<&'r ReadsetDefinition> {
    let mut matching = readsets.iter().filter(|rs| {
        mid_agrees_strict(rs.mid5.as_deref(), forward5) && mid_agrees_strict(rs.mid3.as_deref(), reverse5)
    });

    let first = matching.next()?;
    if matching.next().is_some() {
        return None;
    }
    Some(first)
}

/// Statistics label for a read that matched no readset
pub fn other_match_label(match5: Option<&Match<'_>>, match3: Option<&Match<'_>>) -> String {
    match (match5, match3) {
        (Some(m5), Some(m3)) => format!("{} / {}", m5.barcode_name(), m3.barcode_name()),
        (Some(m5), None) => format!("{} / No Tag", m5.barcode_name()),
        (None, Some(m3)) => format!("No Tag / {}", m3.barcode_name()),
        (None, None) => "No Matches".to_string(),
    }
}
