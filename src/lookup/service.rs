//! Food backend abstraction.
//!
//! Implementations resolve free text or a decoded barcode to food records.
//! They decide their own retry and timeout policy; the modal only sees the
//! final `Ok` or `Err`.

use crate::domain::{FoodRecord, LookupError};

/// A backend that can search the food catalog.
///
/// # Examples
///
/// ```
/// use food_lookup::domain::{FoodRecord, LookupError};
/// use food_lookup::lookup::LookupService;
///
/// struct Offline;
///
/// impl LookupService for Offline {
///     fn search_foods(&self, _query: &str) -> Result<Vec<FoodRecord>, LookupError> {
///         Err(LookupError::Unavailable)
///     }
///
///     fn search_foods_by_barcode(&self, _code: &str) -> Result<Vec<FoodRecord>, LookupError> {
///         Err(LookupError::Unavailable)
///     }
/// }
///
/// assert!(Offline.search_foods("egg").is_err());
/// ```
pub trait LookupService {
    /// Searches by free text. `query` is trimmed and never empty.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] on network or service failure.
    fn search_foods(&self, query: &str) -> Result<Vec<FoodRecord>, LookupError>;

    /// Looks up foods registered under a barcode. May return no records.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] on network or service failure.
    fn search_foods_by_barcode(&self, code: &str) -> Result<Vec<FoodRecord>, LookupError>;
}

impl<S: LookupService + ?Sized> LookupService for Box<S> {
    fn search_foods(&self, query: &str) -> Result<Vec<FoodRecord>, LookupError> {
        (**self).search_foods(query)
    }

    fn search_foods_by_barcode(&self, code: &str) -> Result<Vec<FoodRecord>, LookupError> {
        (**self).search_foods_by_barcode(code)
    }
}
