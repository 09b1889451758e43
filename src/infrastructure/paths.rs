//! Path helpers for locating engine data on the host.

use std::path::PathBuf;

/// Environment variable that overrides [`data_dir`].
pub const DATA_DIR_ENV: &str = "FOOD_LOOKUP_DATA_DIR";

/// Returns the directory for engine-owned files such as the trace log.
///
/// Uses `$FOOD_LOOKUP_DATA_DIR` when set and non-empty, otherwise
/// `food-lookup` under the system temp directory.
///
/// # Examples
///
/// ```
/// use food_lookup::infrastructure::data_dir;
///
/// assert!(data_dir().ends_with("food-lookup") || std::env::var_os("FOOD_LOOKUP_DATA_DIR").is_some());
/// ```
#[must_use]
pub fn data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::temp_dir().join("food-lookup"),
    }
}

/// Expands a leading `~` to `$HOME`.
///
/// Paths without a leading tilde, and all paths when `HOME` is unset, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use food_lookup::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = std::env::var_os("HOME") else {
        return path.to_string();
    };
    let home = home.to_string_lossy();

    if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else if path == "~" {
        home.into_owned()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_plain_paths_alone() {
        assert_eq!(expand_tilde("foods.json"), "foods.json");
        assert_eq!(expand_tilde("/etc/food-lookup.toml"), "/etc/food-lookup.toml");
        assert_eq!(expand_tilde("a/~/b"), "a/~/b");
    }

    #[test]
    fn expands_home_prefix() {
        if let Some(home) = std::env::var_os("HOME") {
            let home = home.to_string_lossy().trim_end_matches('/').to_string();
            assert_eq!(expand_tilde("~/foods.json"), format!("{home}/foods.json"));
        }
    }
}
