//! Price unit normalization.

use stumpage_model::PriceUnit;

/// Maps free unit text onto `$/mbf`, `$/cord` or `$/ton`.
///
/// Checked in that order, so "MBF (tons)" is board-foot priced. Other text,
/// `index` included, passes through trimmed. Blank input yields `None`.
pub fn standardize_unit(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    let unit = if lowered.contains("mbf") || lowered.contains("thousand board") {
        PriceUnit::PerMbf.as_str()
    } else if lowered.contains("cord") {
        PriceUnit::PerCord.as_str()
    } else if lowered.contains("ton") {
        PriceUnit::PerTon.as_str()
    } else {
        trimmed
    };
    Some(unit.to_string())
}
