//! Presentation layer.
//!
//! ```text
//! ModalState → compute_viewmodel → ModalViewModel → render_to → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable modal state
//! - [`renderer`]: Plain-text frame renderer
//! - [`helpers`]: Highlight marking

pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::{render_to, render_to_string};
pub use viewmodel::{DisplayItem, ModalViewModel};
