use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One eligible vehicle line: `A4 - 2018 (Comfort, UberX)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub model: String,
    pub year: String,
    pub categories: Vec<String>,
}

impl VehicleRecord {
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// Brand → records, kept in order of first appearance on the page.
///
/// Serialises as a JSON object whose keys follow that same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandCatalog {
    entries: Vec<(String, Vec<VehicleRecord>)>,
}

impl BrandCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `brand` has an entry, possibly empty. Returns its records.
    pub fn entry(&mut self, brand: &str) -> &mut Vec<VehicleRecord> {
        let idx = match self.entries.iter().position(|(b, _)| b == brand) {
            Some(idx) => idx,
            None => {
                self.entries.push((brand.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn push(&mut self, brand: &str, record: VehicleRecord) {
        self.entry(brand).push(record);
    }

    #[cfg(test)]
    pub fn get(&self, brand: &str) -> Option<&[VehicleRecord]> {
        self.entries
            .iter()
            .find(|(b, _)| b == brand)
            .map(|(_, records)| records.as_slice())
    }

    #[cfg(test)]
    pub fn contains_brand(&self, brand: &str) -> bool {
        self.get(brand).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[VehicleRecord])> {
        self.entries
            .iter()
            .map(|(b, records)| (b.as_str(), records.as_slice()))
    }

    pub fn brands(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(b, _)| b.as_str())
    }

    pub fn brand_count(&self) -> usize {
        self.entries.len()
    }

    pub fn total_records(&self) -> usize {
        self.entries.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<VehicleRecord>)> for BrandCatalog {
    fn from_iter<I: IntoIterator<Item = (String, Vec<VehicleRecord>)>>(iter: I) -> Self {
        let mut catalog = BrandCatalog::new();
        for (brand, records) in iter {
            catalog.entry(&brand).extend(records);
        }
        catalog
    }
}

impl Serialize for BrandCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (brand, records) in &self.entries {
            map.serialize_entry(brand, records)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BrandCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = BrandCatalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of brand names to vehicle lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut catalog = BrandCatalog::new();
                while let Some((brand, records)) =
                    access.next_entry::<String, Vec<VehicleRecord>>()?
                {
                    catalog.entry(&brand).extend(records);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

// ── Tests ──
