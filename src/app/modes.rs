//! Modal view states and dismissal reasons.
//!
//! The modal is always in exactly one [`ModalView`]. Only the event handler
//! moves it between views, following this table:
//!
//! ```text
//! Closed          --open-------------------> Listing
//! Listing         --tap scan (granted)-----> ScanningCamera
//! ScanningCamera  --decode accepted--------> Listing
//! ScanningCamera  --close camera-----------> Listing
//! Listing         --tap create-------------> CreatingFood -> Closed
//! Listing         --select food------------> Closed
//! any open view   --close/backdrop/back----> Closed
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which surface of the modal is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalView {
    /// The modal is not shown.
    Closed,
    /// Search field and result list.
    Listing,
    /// Full-screen camera overlay. Owns the camera device.
    ScanningCamera,
    /// Control handed to the external food-creation flow. Transient: the
    /// modal moves on to `Closed` within the same event.
    CreatingFood,
}

impl ModalView {
    /// Returns `true` for every view other than `Closed`.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

impl fmt::Display for ModalView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Closed => "closed",
            Self::Listing => "listing",
            Self::ScanningCamera => "scanning",
            Self::CreatingFood => "creating food",
        };
        f.write_str(name)
    }
}

/// How the user dismissed the modal. All reasons are handled the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// The explicit close button.
    #[default]
    Button,
    /// A tap outside the modal.
    Backdrop,
    /// The platform back button or gesture.
    BackButton,
}
