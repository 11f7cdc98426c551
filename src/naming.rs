use itertools::Itertools;

const FILE_PREFIX: &str = "uber_eligible_vehicles";

/// `uber_eligible_vehicles_<city>[_brands-..][_required-..][_excluded-..].json`
///
/// Only filters the user actually passed contribute a segment; spaces inside
/// items become underscores.
pub fn output_filename(
    city: &str,
    brands: Option<&[String]>,
    required: Option<&[String]>,
    excluded: Option<&[String]>,
) -> String {
    let segments: String = [("brands", brands), ("required", required), ("excluded", excluded)]
        .into_iter()
        .filter_map(|(label, items)| filter_segment(label, items?))
        .collect();
    format!("{FILE_PREFIX}_{city}{segments}.json")
}

fn filter_segment(label: &str, items: &[String]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let joined = items.iter().map(|item| item.replace(' ', "_")).join("-");
    Some(format!("_{label}-{joined}"))
}

// ── Tests ──
