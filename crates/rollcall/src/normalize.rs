//! Text standardization used as the basis for every matching decision.
//!
//! Two raw values refer to the same entity iff their normalized keys are
//! equal. There is no edit-distance or phonetic matching anywhere in the
//! crate; everything reduces to equality on the output of [`normalize`].

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Abbreviation expansions, applied in order.
const EXPANSIONS: &[(&str, &str)] = &[("grp", "group")];

/// Substrings removed outright, applied after expansions.
const REMOVALS: &[&str] = &["dept"];

/// Canonical lookup form of a raw identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Normalize a raw field value into a lookup key.
///
/// Trims, lower-cases, drops literal periods and spaces, expands `grp` to
/// `group` and removes `dept`. Absent, blank, or values that reduce to
/// nothing yield `None`.
///
/// The rewrite rules are re-applied until the text stops changing, so
/// feeding a key back through `normalize` returns the same key.
///
/// # Example
///
/// ```
/// use rollcall::normalize;
///
/// let key = normalize(Some("  Finance Grp. Dept ")).unwrap();
/// assert_eq!(key.as_str(), "financegroup");
/// assert!(normalize(Some("   ")).is_none());
/// ```
pub fn normalize(text: Option<&str>) -> Option<NormalizedKey> {
    let mut current = text?.trim().to_lowercase();
    loop {
        // Dropping a period can expose whitespace at either edge
        let mut next = current.replace(['.', ' '], "").trim().to_string();
        for (from, to) in EXPANSIONS {
            next = next.replace(from, to);
        }
        for removal in REMOVALS {
            next = next.replace(removal, "");
        }
        if next == current {
            break;
        }
        current = next;
    }

    if current.is_empty() {
        None
    } else {
        Some(NormalizedKey(current))
    }
}

/// Convenience wrapper for already-owned optional strings.
pub fn normalize_field(value: &Option<String>) -> Option<NormalizedKey> {
    normalize(value.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Option<String> {
        normalize(Some(s)).map(NormalizedKey::into_string)
    }

    #[test]
    fn test_absent_and_blank() {
        assert_eq!(normalize(None), None);
        assert_eq!(key(""), None);
        assert_eq!(key(" \t "), None);
    }

    #[test]
    fn test_case_and_separators() {
        assert_eq!(key("  Jane Doe "), Some("janedoe".to_string()));
        assert_eq!(key("JANE@CO.COM"), Some("jane@cocom".to_string()));
        assert_eq!(key("j.smith@co.com"), Some("jsmith@cocom".to_string()));
    }

    #[test]
    fn test_abbreviations() {
        assert_eq!(key("Sales Grp"), Some("salesgroup".to_string()));
        assert_eq!(key("Finance Dept"), Some("finance".to_string()));
        assert_eq!(key("Dept"), None);
    }

    #[test]
    fn test_tabs_are_not_removed() {
        // Only literal spaces are separators; inner tabs survive trimming.
        assert_eq!(key("a\tb"), Some("a\tb".to_string()));
    }

    #[test]
    fn test_whitespace_behind_periods_is_trimmed() {
        assert_eq!(key(".\tJane"), Some("jane".to_string()));
        assert_eq!(key("Jane\t."), Some("jane".to_string()));
        assert_eq!(key(".\u{2028}a"), Some("a".to_string()));
        assert_eq!(key(". \t ."), None);

        for text in [".\tJane", "Jane\t.", "a\t.dept", ".\u{2028}a"] {
            let once = key(text).unwrap();
            assert_eq!(key(&once), Some(once.clone()));
        }
    }

    #[test]
    fn test_removal_exposing_new_match_reaches_fixed_point() {
        // Removing the inner "dept" leaves "dept" again.
        assert_eq!(key("dedeptpt"), None);
        // Removing "dept" exposes "grp".
        assert_eq!(key("grdeptp"), Some("group".to_string()));
        let once = key("xgrdeptpx").unwrap();
        assert_eq!(key(&once), Some(once.clone()));
    }

    #[test]
    fn test_equivalence() {
        assert_eq!(
            normalize(Some("John Smith")),
            normalize(Some("john.smith"))
        );
        assert_ne!(normalize(Some("Jon Smith")), normalize(Some("John Smith")));
    }
}
