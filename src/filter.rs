use std::collections::HashSet;

use crate::catalog::{BrandCatalog, VehicleRecord};

/// Brands kept when the user does not name any with `--brands`.
pub const DEFAULT_BRAND_ALLOWLIST: &[&str] = &[
    "Audi",
    "BMW",
    "BYD",
    "Chevrolet",
    "Citroën",
    "Dacia",
    "Fiat",
    "Ford",
    "Honda",
    "Hyundai",
    "Jeep",
    "Kia",
    "MG",
    "Mercedes-Benz",
    "Mitsubishi",
    "Nio",
    "Nissan",
    "Opel",
    "Peugeot",
    "Renault",
    "Seat",
    "Skoda",
    "Tesla",
    "Toyota",
    "Volkswagen",
];

/// Independent, optional predicates. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub required_categories: Option<HashSet<String>>,
    pub excluded_categories: Option<HashSet<String>>,
    pub allowed_brands: Option<HashSet<String>>,
}

impl FilterCriteria {
    pub fn new(
        required: Option<&[String]>,
        excluded: Option<&[String]>,
        allowed_brands: Option<&[String]>,
    ) -> Self {
        let to_set = |items: &[String]| items.iter().cloned().collect::<HashSet<_>>();
        FilterCriteria {
            required_categories: required.map(to_set),
            excluded_categories: excluded.map(to_set),
            allowed_brands: allowed_brands.map(to_set),
        }
    }

    pub fn allows_brand(&self, brand: &str) -> bool {
        self.allowed_brands
            .as_ref()
            .map_or(true, |allowed| allowed.contains(brand))
    }

    pub fn allows_record(&self, record: &VehicleRecord) -> bool {
        let has_required = self
            .required_categories
            .as_ref()
            .map_or(true, |req| req.iter().all(|c| record.has_category(c)));
        let has_excluded = self
            .excluded_categories
            .as_ref()
            .is_some_and(|ex| ex.iter().any(|c| record.has_category(c)));
        has_required && !has_excluded
    }
}

/// Brand stage, then category stage; brands left with no records are dropped.
pub fn apply(catalog: &BrandCatalog, criteria: &FilterCriteria) -> BrandCatalog {
    catalog
        .iter()
        .filter(|(brand, _)| criteria.allows_brand(brand))
        .map(|(brand, records)| {
            let kept: Vec<VehicleRecord> = records
                .iter()
                .filter(|r| criteria.allows_record(r))
                .cloned()
                .collect();
            (brand.to_string(), kept)
        })
        .filter(|(_, kept)| !kept.is_empty())
        .collect()
}

/// Explicit brands win; otherwise the built-in list, unless it is disabled.
pub fn resolve_allowed_brands(
    brands: Option<&[String]>,
    use_default_allowlist: bool,
) -> Option<Vec<String>> {
    match brands {
        Some(brands) => Some(brands.to_vec()),
        None if use_default_allowlist => Some(
            DEFAULT_BRAND_ALLOWLIST
                .iter()
                .map(|b| b.to_string())
                .collect(),
        ),
        None => None,
    }
}

/// `"Comfort, Green,,"` → `["Comfort", "Green"]`; nothing left → `None`.
pub fn parse_list(raw: &str) -> Option<Vec<String>> {
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn record(model: &str, categories: &[&str]) -> VehicleRecord {
        VehicleRecord {
            model: model.to_string(),
            year: "2020".to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> BrandCatalog {
        let mut c = BrandCatalog::new();
        c.push("Audi", record("A4", &["Comfort", "UberX"]));
        c.push("Audi", record("A8", &["Comfort", "Black"]));
        c.push("Tesla", record("Model 3", &["Comfort", "Green", "UberX"]));
        c.push("Tesla", record("Model S", &["Black", "Comfort", "Green"]));
        c.push("Dacia", record("Sandero", &["UberX"]));
        c.push("Polestar", record("2", &["Comfort", "Green", "Black"]));
        c
    }

    fn criteria(required: &[&str], excluded: &[&str], brands: &[&str]) -> FilterCriteria {
        let opt = |items: &[&str]| (!items.is_empty()).then(|| strings(items));
        FilterCriteria::new(
            opt(required).as_deref(),
            opt(excluded).as_deref(),
            opt(brands).as_deref(),
        )
    }

    #[test]
    fn required_and_excluded_scenario() {
        let mut c = BrandCatalog::new();
        c.push("Audi", record("A4", &["Comfort", "UberX"]));
        c.push("Audi", record("A8", &["Comfort", "Black"]));
        let out = apply(&c, &criteria(&["Comfort"], &["Black"], &[]));
        let audi = out.get("Audi").unwrap();
        assert_eq!(audi.len(), 1);
        assert_eq!(audi[0].model, "A4");
    }

    #[test]
    fn no_criteria_keeps_everything() {
        let c = sample();
        assert_eq!(apply(&c, &FilterCriteria::default()), c);
    }

    #[test]
    fn required_is_a_conjunction() {
        let out = apply(&sample(), &criteria(&["Comfort", "Green"], &[], &[]));
        let brands: Vec<&str> = out.brands().collect();
        assert_eq!(brands, vec!["Tesla", "Polestar"]);
        assert_eq!(out.total_records(), 3);
    }

    #[test]
    fn excluded_drops_any_match() {
        let out = apply(&sample(), &criteria(&[], &["Black", "Green"], &[]));
        let models: Vec<&str> = out
            .iter()
            .flat_map(|(_, rs)| rs.iter().map(|r| r.model.as_str()))
            .collect();
        assert_eq!(models, vec!["A4", "Sandero"]);
    }

    #[test]
    fn brand_match_is_exact_and_case_sensitive() {
        let out = apply(&sample(), &criteria(&[], &[], &["tesla", "Dacia"]));
        let brands: Vec<&str> = out.brands().collect();
        assert_eq!(brands, vec!["Dacia"]);
    }

    #[test]
    fn emptied_brands_are_dropped() {
        let out = apply(&sample(), &criteria(&["Green"], &[], &[]));
        assert!(!out.contains_brand("Audi"));
        assert!(!out.contains_brand("Dacia"));
        for (_, records) in out.iter() {
            assert!(!records.is_empty());
        }
    }

    #[test]
    fn empty_input_entries_do_not_survive() {
        let mut c = sample();
        c.entry("Lada");
        let out = apply(&c, &FilterCriteria::default());
        assert!(!out.contains_brand("Lada"));
    }

    #[test]
    fn nothing_left_is_an_empty_catalog() {
        let out = apply(&sample(), &criteria(&["Flying"], &[], &[]));
        assert!(out.is_empty());
    }

    #[test]
    fn idempotent() {
        let cases = [
            criteria(&["Comfort"], &["Black"], &[]),
            criteria(&[], &["UberX"], &["Audi", "Tesla"]),
            criteria(&["Green"], &[], &[]),
            FilterCriteria::default(),
        ];
        for crit in cases {
            let once = apply(&sample(), &crit);
            let twice = apply(&once, &crit);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn monotonic_in_every_criterion() {
        let base = apply(&sample(), &criteria(&["Comfort"], &[], &[])).total_records();
        let more_required = apply(&sample(), &criteria(&["Comfort", "UberX"], &[], &[]));
        assert!(more_required.total_records() <= base);

        let base = apply(&sample(), &criteria(&[], &["Black"], &[])).total_records();
        let more_excluded = apply(&sample(), &criteria(&[], &["Black", "UberX"], &[]));
        assert!(more_excluded.total_records() <= base);

        let base = apply(&sample(), &criteria(&[], &[], &["Audi", "Tesla", "Dacia"])).total_records();
        let fewer_brands = apply(&sample(), &criteria(&[], &[], &["Audi"]));
        assert!(fewer_brands.total_records() <= base);
    }

    #[test]
    fn duplicate_categories_do_not_matter() {
        let mut c = BrandCatalog::new();
        c.push("Kia", record("Niro", &["Green", "Green", "UberX"]));
        let out = apply(&c, &criteria(&["Green"], &["Black"], &[]));
        assert_eq!(out.total_records(), 1);
    }

    #[test]
    fn default_allowlist_applies_only_without_explicit_brands() {
        let default = resolve_allowed_brands(None, true).unwrap();
        assert_eq!(default.len(), 25);
        assert!(default.iter().any(|b| b == "Citroën"));

        let explicit = strings(&["Polestar"]);
        assert_eq!(
            resolve_allowed_brands(Some(explicit.as_slice()), true),
            Some(explicit.clone())
        );
        assert_eq!(resolve_allowed_brands(None, false), None);
    }

    #[test]
    fn parse_list_trims_and_drops_blanks() {
        assert_eq!(
            parse_list(" Comfort , Store Pickup,,"),
            Some(strings(&["Comfort", "Store Pickup"]))
        );
        assert_eq!(parse_list(""), None);
        assert_eq!(parse_list(" , ,"), None);
    }
}
