//! Domain layer for the food lookup engine.
//!
//! This module contains the core value types shared by every other layer:
//! the immutable [`FoodRecord`] returned by lookups, the [`BarcodeFormat`]
//! policy enum, and the crate's error types. Nothing in here knows about
//! modal state, timing, or the embedder.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`food`]: Food record and barcode format models
//!
//! # Examples
//!
//! ```
//! use food_lookup::domain::FoodRecord;
//!
//! let egg = FoodRecord::new("egg-1", "Boiled egg", 155.0);
//! assert_eq!(egg.calories_label(), "155 kcal / 100g");
//! ```

pub mod error;
pub mod food;

pub use error::{FoodLookupError, LookupError, Result};
pub use food::{BarcodeFormat, FoodRecord};
