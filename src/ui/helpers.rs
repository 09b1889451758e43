//! Shared rendering utilities.
//!
//! Operates on character indices, not byte indices, so multi-byte names are
//! highlighted correctly.

/// Wraps the highlighted character ranges of `text` in `[` and `]`.
///
/// `ranges` are `(start, end)` character indices with exclusive ends, sorted
/// and non-overlapping. Out-of-range ends are clamped.
///
/// # Example
///
/// ```rust
/// use food_lookup::ui::helpers::mark_highlights;
///
/// assert_eq!(mark_highlights("Eggplant", &[(0, 3)]), "[Egg]plant");
/// assert_eq!(mark_highlights("Müsli", &[(1, 2)]), "M[ü]sli");
/// ```
#[must_use]
pub fn mark_highlights(text: &str, ranges: &[(usize, usize)]) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + ranges.len() * 2);
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }

        out.extend(&chars[current_pos..start]);
        out.push('[');
        out.extend(&chars[start..end]);
        out.push(']');
        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_multiple_runs() {
        assert_eq!(mark_highlights("Egg, whole", &[(0, 1), (5, 7)]), "[E]gg, [wh]ole");
    }

    #[test]
    fn clamps_out_of_range_end() {
        assert_eq!(mark_highlights("Egg", &[(1, 10)]), "E[gg]");
    }

    #[test]
    fn no_ranges_is_identity() {
        assert_eq!(mark_highlights("Oats", &[]), "Oats");
    }
}
