//! Food record and barcode format models.
//!
//! [`FoodRecord`] is the unit every lookup returns. Records are immutable
//! once produced: result sets own their records outright and nothing
//! mutates them in place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A food entry as returned by the catalog or barcode lookup.
///
/// # Fields
///
/// - `id`: Identifier, unique within one catalog. May be empty for records
///   that were never persisted remotely.
/// - `name`: Display name
/// - `calories`: Energy per reference serving (100 g)
/// - `nutrients`: Optional additional nutrients keyed by name (grams)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub calories: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub nutrients: BTreeMap<String, f64>,
}

impl FoodRecord {
    /// Creates a record without additional nutrients.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, calories: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            calories,
            nutrients: BTreeMap::new(),
        }
    }

    /// Adds a nutrient value, replacing any previous value for the same key.
    #[must_use]
    pub fn with_nutrient(mut self, name: impl Into<String>, grams: f64) -> Self {
        self.nutrients.insert(name.into(), grams);
        self
    }

    /// Returns the calorie line shown under the name in result lists.
    ///
    /// Whole numbers are printed without a fractional part.
    ///
    /// # Examples
    ///
    /// ```
    /// use food_lookup::domain::FoodRecord;
    ///
    /// assert_eq!(FoodRecord::new("", "Oats", 389.0).calories_label(), "389 kcal / 100g");
    /// assert_eq!(FoodRecord::new("", "Kiwi", 60.5).calories_label(), "60.5 kcal / 100g");
    /// ```
    #[must_use]
    pub fn calories_label(&self) -> String {
        if self.calories.fract() == 0.0 {
            format!("{:.0} kcal / 100g", self.calories)
        } else {
            format!("{} kcal / 100g", self.calories)
        }
    }

    /// Returns the list key for this record at `index` in a result list.
    ///
    /// Uses the identifier when present and falls back to `name-index`.
    #[must_use]
    pub fn list_key(&self, index: usize) -> String {
        if self.id.is_empty() {
            format!("{}-{index}", self.name)
        } else {
            self.id.clone()
        }
    }
}

/// Symbologies a camera integration can report for a decoded barcode.
///
/// Which of these the engine acts on is configuration
/// ([`Config::barcode_formats`](crate::Config::barcode_formats)), not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarcodeFormat {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Code39,
    Code128,
    Itf14,
    Qr,
    DataMatrix,
}

impl BarcodeFormat {
    /// Retail product symbologies accepted when nothing else is configured.
    pub const RETAIL: [Self; 4] = [Self::Ean13, Self::Ean8, Self::UpcA, Self::UpcE];

    /// Returns the configuration name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ean13 => "ean13",
            Self::Ean8 => "ean8",
            Self::UpcA => "upc_a",
            Self::UpcE => "upc_e",
            Self::Code39 => "code39",
            Self::Code128 => "code128",
            Self::Itf14 => "itf14",
            Self::Qr => "qr",
            Self::DataMatrix => "data_matrix",
        }
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarcodeFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let format = match normalized.as_str() {
            "ean13" | "ean_13" => Self::Ean13,
            "ean8" | "ean_8" => Self::Ean8,
            "upc_a" | "upca" => Self::UpcA,
            "upc_e" | "upce" => Self::UpcE,
            "code39" | "code_39" => Self::Code39,
            "code128" | "code_128" => Self::Code128,
            "itf14" | "itf_14" => Self::Itf14,
            "qr" => Self::Qr,
            "data_matrix" | "datamatrix" => Self::DataMatrix,
            other => return Err(format!("unknown barcode format '{other}'")),
        };
        Ok(format)
    }
}
