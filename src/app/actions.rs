//! Actions representing side effects to be executed by the embedder.
//!
//! The event handler never performs I/O itself. After processing each event
//! it returns a `Vec<Action>`; the embedder executes them in order. Lookup
//! results and permission answers come back later as new events.
//!
//! # Example
//!
//! ```rust
//! use food_lookup::app::Action;
//!
//! let actions = vec![Action::StopCamera, Action::CreateFoodRequested];
//! assert_eq!(actions.len(), 2);
//! ```

use super::modes::CloseReason;
use crate::domain::FoodRecord;
use crate::lookup::LookupRequest;
use chrono::{DateTime, Utc};

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Send a lookup to the food backend.
    ///
    /// The embedder must eventually feed the answer back as
    /// `Event::LookupCompleted`, even if the modal has been closed since.
    Lookup(LookupRequest),

    /// Deliver an `Event::Tick` no earlier than this time.
    ///
    /// Replaces any previously requested wake-up.
    WakeAt(DateTime<Utc>),

    /// Ask the host platform for camera authorization.
    RequestCameraPermission,

    /// Start the camera preview and barcode decoder.
    StartCamera,

    /// Stop the camera and release the device.
    StopCamera,

    /// The user picked a food (`onSelectFood`). Fired once per selection.
    FoodSelected(FoodRecord),

    /// The user wants to define a new food (`onCreateFood`).
    CreateFoodRequested,

    /// The modal was dismissed (`onClose`).
    Dismissed {
        /// Which dismissal path was taken.
        reason: CloseReason,
    },
}
