//! View model types representing renderable modal state.
//!
//! View models are computed from [`ModalState`](crate::app::ModalState) via
//! `compute_viewmodel()` and consumed by the renderer or by an embedding UI.
//! They contain no business logic, only display-ready data.
//!
//! # Example
//!
//! ```rust
//! use food_lookup::app::ModalView;
//! use food_lookup::ui::{DisplayItem, ModalViewModel};
//!
//! let vm = ModalViewModel {
//!     view: ModalView::Listing,
//!     search_text: "egg".to_string(),
//!     items: vec![DisplayItem {
//!         key: "egg".to_string(),
//!         name: "Egg, whole".to_string(),
//!         calories: "155 kcal / 100g".to_string(),
//!         highlight_ranges: vec![(0, 3)],
//!     }],
//!     notice: None,
//!     showing_recent: false,
//!     awaiting_permission: false,
//!     awaiting_barcode: false,
//! };
//! assert_eq!(vm.items.len(), 1);
//! ```

use crate::app::ModalView;
use serde::Serialize;

/// Complete modal view model for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalViewModel {
    /// Which screen of the modal is visible.
    pub view: ModalView,

    /// Current contents of the search field.
    pub search_text: String,

    /// Rows of the result list, in display order.
    pub items: Vec<DisplayItem>,

    /// User-facing message (permission denied, lookup failed), if any.
    pub notice: Option<String>,

    /// Whether `items` is the recent-foods list rather than a lookup result.
    pub showing_recent: bool,

    /// Whether a camera permission prompt is outstanding.
    pub awaiting_permission: bool,

    /// Whether a barcode lookup is in flight.
    pub awaiting_barcode: bool,
}

/// Display information for a single food row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    /// Stable list key (record id, or `name-index` when the id is empty).
    pub key: String,

    pub name: String,

    /// Calorie line, e.g. `155 kcal / 100g`.
    pub calories: String,

    /// Character ranges of `name` to highlight.
    ///
    /// Each tuple is `(start_index, end_index)` in UTF-8 character indices,
    /// end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}
