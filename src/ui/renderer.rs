//! Plain-text modal renderer.
//!
//! Writes one frame per call. Used by the replay CLI and by tests; an
//! embedding UI renders from [`ModalViewModel`] directly.
//!
//! # Output
//!
//! ```text
//! == listing ==
//! search: egg
//! - [Egg], whole  155 kcal / 100g
//! - [Egg]plant  25 kcal / 100g
//! ```

use crate::app::ModalView;
use crate::ui::helpers::mark_highlights;
use crate::ui::viewmodel::ModalViewModel;
use std::io::{self, Write};

/// Renders a view model to `out`.
///
/// # Errors
///
/// Returns any error produced by the writer.
pub fn render_to<W: Write>(vm: &ModalViewModel, out: &mut W) -> io::Result<()> {
    writeln!(out, "== {} ==", vm.view)?;

    match vm.view {
        ModalView::Closed => return Ok(()),
        ModalView::ScanningCamera => {
            writeln!(out, "camera: scanning")?;
        }
        ModalView::CreatingFood => {
            writeln!(out, "create food")?;
        }
        ModalView::Listing => {}
    }

    writeln!(out, "search: {}", vm.search_text)?;

    if let Some(notice) = &vm.notice {
        writeln!(out, "! {notice}")?;
    }
    if vm.awaiting_permission {
        writeln!(out, "... waiting for camera permission")?;
    }
    if vm.awaiting_barcode {
        writeln!(out, "... looking up barcode")?;
    }

    if vm.showing_recent {
        writeln!(out, "recent:")?;
    }
    if vm.items.is_empty() {
        writeln!(out, "(no foods)")?;
    }
    for item in &vm.items {
        writeln!(
            out,
            "- {}  {}",
            mark_highlights(&item.name, &item.highlight_ranges),
            item.calories
        )?;
    }

    Ok(())
}

/// Renders a view model to a `String`.
#[must_use]
pub fn render_to_string(vm: &ModalViewModel) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail.
    let _ = render_to(vm, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::viewmodel::DisplayItem;

    fn listing() -> ModalViewModel {
        ModalViewModel {
            view: ModalView::Listing,
            search_text: "egg".to_string(),
            items: vec![DisplayItem {
                key: "egg".to_string(),
                name: "Egg, whole".to_string(),
                calories: "155 kcal / 100g".to_string(),
                highlight_ranges: vec![(0, 3)],
            }],
            notice: None,
            showing_recent: false,
            awaiting_permission: false,
            awaiting_barcode: false,
        }
    }

    #[test]
    fn renders_highlighted_rows() {
        let text = render_to_string(&listing());
        assert!(text.starts_with("== listing ==\n"));
        assert!(text.contains("- [Egg], whole  155 kcal / 100g"));
    }

    #[test]
    fn renders_notice_and_empty_list() {
        let mut vm = listing();
        vm.items.clear();
        vm.notice = Some("Lookup failed".to_string());

        let text = render_to_string(&vm);
        assert!(text.contains("! Lookup failed"));
        assert!(text.contains("(no foods)"));
    }

    #[test]
    fn closed_modal_renders_header_only() {
        let mut vm = listing();
        vm.view = ModalView::Closed;
        assert_eq!(render_to_string(&vm), "== closed ==\n");
    }
}
