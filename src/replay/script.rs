//! Replay script format.
//!
//! ```json
//! {
//!   "steps": [
//!     { "at_ms": 0,    "do": "open", "recent_foods": [] },
//!     { "at_ms": 10,   "do": "type", "text": "egg" },
//!     { "at_ms": 400,  "do": "wait" },
//!     { "at_ms": 410,  "do": "tap_scan" },
//!     { "do": "permission", "granted": true },
//!     { "at_ms": 900,  "do": "scan", "barcode": "4006381333931", "format": "ean13" },
//!     { "do": "deliver", "order": "lifo" },
//!     { "do": "select", "index": 0 }
//!   ]
//! }
//! ```
//!
//! `at_ms` is milliseconds since the start of the replay. A step without
//! `at_ms` happens at the time of the previous step. Times must not go
//! backwards.

use crate::app::CloseReason;
use crate::domain::{BarcodeFormat, FoodLookupError, FoodRecord, Result};
use serde::Deserialize;
use std::path::Path;

/// A parsed replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

/// One timed step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub at_ms: Option<u64>,

    #[serde(flatten)]
    pub action: StepAction,
}

/// What happens at a step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "do", rename_all = "snake_case")]
pub enum StepAction {
    /// Open the modal with a recent-foods snapshot.
    Open {
        #[serde(default)]
        recent_foods: Vec<FoodRecord>,
    },
    /// Replace the search field contents.
    Type { text: String },
    /// Let time pass.
    Wait,
    /// Tap the barcode icon.
    TapScan,
    /// The host answers the permission prompt.
    Permission { granted: bool },
    /// The user withdraws camera access in system settings.
    Revoke,
    /// The camera decodes a barcode.
    Scan {
        barcode: String,
        #[serde(default = "default_format")]
        format: BarcodeFormat,
    },
    CloseCamera,
    TapCreate,
    Select { index: usize },
    Close {
        #[serde(default)]
        reason: CloseReason,
    },
    /// Answer held-back lookups.
    Deliver {
        #[serde(default)]
        order: DeliveryOrder,
        /// How many to answer; all when absent.
        #[serde(default)]
        count: Option<usize>,
    },
}

const fn default_format() -> BarcodeFormat {
    BarcodeFormat::Ean13
}

/// Order in which held-back lookups are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOrder {
    /// Oldest request first.
    #[default]
    Fifo,
    /// Newest request first.
    Lifo,
}

impl Script {
    /// Parses a script from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FoodLookupError::Script`] if the JSON is malformed or a step
    /// is unknown.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| FoodLookupError::Script(format!("failed to parse script: {e}")))
    }

    /// Reads and parses a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading replay script");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps_with_defaults() {
        let script = Script::from_json_str(
            r#"{"steps":[
                {"at_ms":0,"do":"open"},
                {"do":"scan","barcode":"123"},
                {"at_ms":5,"do":"close","reason":"backdrop"},
                {"do":"deliver","order":"lifo","count":1}
            ]}"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 4);
        assert_eq!(script.steps[1].at_ms, None);
        assert_eq!(
            script.steps[1].action,
            StepAction::Scan {
                barcode: "123".to_string(),
                format: BarcodeFormat::Ean13
            }
        );
        assert_eq!(
            script.steps[2].action,
            StepAction::Close {
                reason: CloseReason::Backdrop
            }
        );
        assert_eq!(
            script.steps[3].action,
            StepAction::Deliver {
                order: DeliveryOrder::Lifo,
                count: Some(1)
            }
        );
    }

    #[test]
    fn unknown_step_is_script_error() {
        let err = Script::from_json_str(r#"{"steps":[{"do":"dance"}]}"#).unwrap_err();
        assert!(matches!(err, FoodLookupError::Script(_)));
    }
}
