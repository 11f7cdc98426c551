use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::VehicleRecord;

// "<model> - <year> (<cat>, <cat>, ...)", anchored at the start only.
static VEHICLE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w\s\-\.]+)\s*-\s*(\d{4})\s*\(([^)]+)\)").unwrap());

/// Label of the chevron icon's `<title>`, glued to every brand header's text.
const DECORATIVE_SUFFIX: &str = "Down Small";

pub fn parse_vehicle_line(text: &str) -> Option<VehicleRecord> {
    let caps = VEHICLE_LINE_RE.captures(text)?;
    Some(VehicleRecord {
        model: caps[1].trim().to_string(),
        year: caps[2].to_string(),
        categories: caps[3].split(',').map(|c| c.trim().to_string()).collect(),
    })
}

pub fn clean_brand_name(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix(DECORATIVE_SUFFIX)
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_line() {
        let r = parse_vehicle_line("A4 - 2018 (Comfort, UberX, Store Pickup)").unwrap();
        assert_eq!(r.model, "A4");
        assert_eq!(r.year, "2018");
        assert_eq!(r.categories, vec!["Comfort", "UberX", "Store Pickup"]);
    }

    #[test]
    fn hyphenated_and_dotted_models() {
        let r = parse_vehicle_line("e-tron GT - 2021 (Black)").unwrap();
        assert_eq!(r.model, "e-tron GT");
        let r = parse_vehicle_line("Classe C 220 d. - 2019 (Comfort)").unwrap();
        assert_eq!(r.model, "Classe C 220 d.");
    }

    #[test]
    fn unicode_word_characters() {
        let r = parse_vehicle_line("ë-C4 - 2021 (UberX, Green)").unwrap();
        assert_eq!(r.model, "ë-C4");
        let r = parse_vehicle_line("Série 3 - 2017 (UberX)").unwrap();
        assert_eq!(r.model, "Série 3");
    }

    #[test]
    fn tolerates_missing_spaces() {
        let r = parse_vehicle_line("C-HR-2019(Comfort,UberX)").unwrap();
        assert_eq!(r.model, "C-HR");
        assert_eq!(r.year, "2019");
        assert_eq!(r.categories, vec!["Comfort", "UberX"]);
    }

    #[test]
    fn trailing_text_after_categories_is_ignored() {
        let r = parse_vehicle_line("Leaf - 2018 (Green) *electric").unwrap();
        assert_eq!(r.categories, vec!["Green"]);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_vehicle_line("See the full requirements").is_none());
        assert!(parse_vehicle_line("X5 - 19 (Black)").is_none());
        assert!(parse_vehicle_line("X5 - 20191 (Black)").is_none());
        assert!(parse_vehicle_line("X5 - 2019 ()").is_none());
        assert!(parse_vehicle_line("X5 - 2019").is_none());
        assert!(parse_vehicle_line("Prius+ - 2017 (UberXL)").is_none());
        assert!(parse_vehicle_line("").is_none());
    }

    #[test]
    fn year_is_always_four_digits() {
        let lines = [
            "A3 - 2018 (UberX)",
            "Model 3 - 2019 (Comfort, Green)",
            "Jazz 1.5 - 2020 (UberX)",
        ];
        let year_re = Regex::new(r"^\d{4}$").unwrap();
        for line in lines {
            let r = parse_vehicle_line(line).unwrap();
            assert!(year_re.is_match(&r.year), "bad year in {line:?}");
            assert!(!r.categories.is_empty());
        }
    }

    #[test]
    fn brand_suffix_removed() {
        assert_eq!(clean_brand_name("AudiDown Small"), "Audi");
        assert_eq!(clean_brand_name("  Mercedes-Benz Down Small "), "Mercedes-Benz");
        assert_eq!(clean_brand_name("Tesla"), "Tesla");
        assert_eq!(clean_brand_name("Down Small"), "");
    }
}
