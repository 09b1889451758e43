//! JSON file-backed food catalog.
//!
//! A read-only [`LookupService`] that loads the whole catalog into memory
//! once. Text search ranks records by fuzzy score against the name; barcode
//! search is an exact match on any registered code.
//!
//! # File Format
//!
//! ```json
//! {
//!   "foods": [
//!     {
//!       "id": "egg-whole",
//!       "name": "Egg, whole",
//!       "calories": 155,
//!       "nutrients": { "protein": 13.0 },
//!       "barcodes": ["4006381333931"]
//!     }
//!   ]
//! }
//! ```

use super::service::LookupService;
use crate::domain::{FoodLookupError, FoodRecord, LookupError, Result};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Top-level catalog file layout.
#[derive(Debug, Deserialize)]
struct CatalogData {
    #[serde(default)]
    foods: Vec<CatalogEntry>,
}

/// One catalog entry: a record plus the barcodes it is sold under.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(flatten)]
    record: FoodRecord,

    #[serde(default)]
    barcodes: Vec<String>,
}

/// In-memory catalog loaded from a JSON file.
///
/// Records keep file order; that order breaks ties between equal fuzzy
/// scores.
pub struct JsonCatalog {
    foods: Vec<FoodRecord>,

    /// Barcode to indices into `foods`.
    barcodes: HashMap<String, Vec<usize>>,

    max_results: usize,

    /// When set, every lookup fails with [`LookupError::Unavailable`].
    offline: bool,
}

impl std::fmt::Debug for JsonCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonCatalog")
            .field("foods", &self.foods.len())
            .field("barcodes", &self.barcodes.len())
            .field("max_results", &self.max_results)
            .field("offline", &self.offline)
            .finish()
    }
}

impl JsonCatalog {
    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid JSON
    /// - Two entries share a non-empty id, or an entry has a blank name
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use food_lookup::lookup::JsonCatalog;
    ///
    /// let catalog = JsonCatalog::from_file("foods.json", 25)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file(path: impl AsRef<Path>, max_results: usize) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading food catalog");

        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents, max_results)
    }

    /// Parses a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Same conditions as [`JsonCatalog::from_file`], minus I/O.
    pub fn from_json_str(contents: &str, max_results: usize) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(contents)
            .map_err(|e| FoodLookupError::Catalog(format!("failed to parse JSON: {e}")))?;

        let mut seen_ids = HashSet::new();
        let mut foods = Vec::with_capacity(data.foods.len());
        let mut barcodes: HashMap<String, Vec<usize>> = HashMap::new();

        for entry in data.foods {
            if entry.record.name.trim().is_empty() {
                return Err(FoodLookupError::Catalog(format!(
                    "entry {} has a blank name",
                    foods.len()
                )));
            }
            if !entry.record.id.is_empty() && !seen_ids.insert(entry.record.id.clone()) {
                return Err(FoodLookupError::Catalog(format!(
                    "duplicate food id: {}",
                    entry.record.id
                )));
            }

            let index = foods.len();
            for code in entry.barcodes {
                let code = code.trim().to_string();
                if !code.is_empty() {
                    barcodes.entry(code).or_default().push(index);
                }
            }
            foods.push(entry.record);
        }

        tracing::debug!(
            food_count = foods.len(),
            barcode_count = barcodes.len(),
            "catalog loaded"
        );

        Ok(Self {
            foods,
            barcodes,
            max_results,
            offline: false,
        })
    }

    /// Marks the catalog offline (or back online).
    pub fn set_offline(&mut self, offline: bool) {
        tracing::info!(offline, "catalog availability changed");
        self.offline = offline;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Returns the records whose ids appear in `ids`, in `ids` order.
    ///
    /// Unknown ids are skipped. Used to seed the recent-foods list.
    #[must_use]
    pub fn records_by_id(&self, ids: &[String]) -> Vec<FoodRecord> {
        ids.iter()
            .filter_map(|id| self.foods.iter().find(|food| &food.id == id))
            .cloned()
            .collect()
    }

    fn ensure_online(&self) -> std::result::Result<(), LookupError> {
        if self.offline {
            Err(LookupError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl LookupService for JsonCatalog {
    fn search_foods(&self, query: &str) -> std::result::Result<Vec<FoodRecord>, LookupError> {
        let _span = tracing::debug_span!("catalog_search_foods", query = %query).entered();
        self.ensure_online()?;

        let matcher = SkimMatcherV2::default();
        let tokens: Vec<&str> = query.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        // Every token must match; stable sort keeps file order for equal scores.
        let mut scored: Vec<(i64, &FoodRecord)> = self
            .foods
            .iter()
            .filter_map(|food| {
                tokens
                    .iter()
                    .map(|token| matcher.fuzzy_match(&food.name, token))
                    .sum::<Option<i64>>()
                    .map(|score| (score, food))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let results: Vec<FoodRecord> = scored
            .into_iter()
            .take(self.max_results)
            .map(|(_, food)| food.clone())
            .collect();

        tracing::debug!(count = results.len(), "catalog search complete");
        Ok(results)
    }

    fn search_foods_by_barcode(&self, code: &str) -> std::result::Result<Vec<FoodRecord>, LookupError> {
        let _span = tracing::debug_span!("catalog_search_by_barcode", code = %code).entered();
        self.ensure_online()?;

        let results: Vec<FoodRecord> = self
            .barcodes
            .get(code.trim())
            .map(|indices| indices.iter().map(|&i| self.foods[i].clone()).collect())
            .unwrap_or_default();

        tracing::debug!(found = !results.is_empty(), "barcode lookup complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = r#"{
        "foods": [
            { "id": "egg", "name": "Egg, whole", "calories": 155, "barcodes": ["4006381333931"] },
            { "id": "eggplant", "name": "Eggplant", "calories": 25 },
            { "id": "oats", "name": "Rolled oats", "calories": 389, "nutrients": { "fiber": 10.6 } }
        ]
    }"#;

    #[test]
    fn text_search_ranks_and_filters() {
        let catalog = JsonCatalog::from_json_str(CATALOG, 25).unwrap();
        let results = catalog.search_foods("egg").unwrap();

        let ids: Vec<&str> = results.iter().map(|f| f.id.as_str()).collect();
        assert!(ids.contains(&"egg"));
        assert!(ids.contains(&"eggplant"));
        assert!(!ids.contains(&"oats"));
    }

    #[test]
    fn every_token_must_match() {
        let catalog = JsonCatalog::from_json_str(CATALOG, 25).unwrap();

        let results = catalog.search_foods("rolled  oats").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "oats");

        assert!(catalog.search_foods("egg oats").unwrap().is_empty());
    }

    #[test]
    fn text_search_respects_max_results() {
        let catalog = JsonCatalog::from_json_str(CATALOG, 1).unwrap();
        assert_eq!(catalog.search_foods("egg").unwrap().len(), 1);
    }

    #[test]
    fn barcode_search_is_exact() {
        let catalog = JsonCatalog::from_json_str(CATALOG, 25).unwrap();

        let found = catalog.search_foods_by_barcode("4006381333931").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "egg");

        assert!(catalog.search_foods_by_barcode("400638133393").unwrap().is_empty());
    }

    #[test]
    fn offline_catalog_fails_lookups() {
        let mut catalog = JsonCatalog::from_json_str(CATALOG, 25).unwrap();
        catalog.set_offline(true);

        assert_eq!(catalog.search_foods("egg"), Err(LookupError::Unavailable));
        assert_eq!(
            catalog.search_foods_by_barcode("4006381333931"),
            Err(LookupError::Unavailable)
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{"foods":[
            {"id":"a","name":"Apple","calories":52},
            {"id":"a","name":"Apricot","calories":48}
        ]}"#;
        let err = JsonCatalog::from_json_str(json, 25).unwrap_err();
        assert!(matches!(err, FoodLookupError::Catalog(_)));
    }

    #[test]
    fn nutrients_survive_loading() {
        let catalog = JsonCatalog::from_json_str(CATALOG, 25).unwrap();
        let oats = catalog.records_by_id(&["oats".to_string()]);
        assert_eq!(oats[0].nutrients.get("fiber"), Some(&10.6));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = JsonCatalog::from_file(file.path(), 25).unwrap();
        assert_eq!(catalog.len(), 3);
    }
}
