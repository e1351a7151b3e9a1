//! The closed set of expense categories.

use serde::{Deserialize, Serialize};

/// An expense category.
///
/// The set is closed: the database stores the upper-case code and every
/// stored value maps back to exactly one variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Groceries,
    Utilities,
    Entertainment,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Groceries, Self::Utilities, Self::Entertainment];

    /// Returns the canonical code stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Groceries => "GROCERIES",
            Self::Utilities => "UTILITIES",
            Self::Entertainment => "ENTERTAINMENT",
        }
    }

    /// Matches a code case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GROCERIES" => Some(Self::Groceries),
            "UTILITIES" => Some(Self::Utilities),
            "ENTERTAINMENT" => Some(Self::Entertainment),
            _ => None,
        }
    }

    /// Comma-separated list of valid codes, for validation messages.
    pub fn valid_codes() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Category::parse("utilities"), Some(Category::Utilities));
        assert_eq!(Category::parse("Groceries"), Some(Category::Groceries));
        assert_eq!(
            Category::parse("ENTERTAINMENT"),
            Some(Category::Entertainment)
        );
    }

    #[test]
    fn parse_rejects_unknown_codes() {
        assert_eq!(Category::parse("invalid_cat"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn codes_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn valid_codes_lists_all_three() {
        assert_eq!(
            Category::valid_codes(),
            "GROCERIES, UTILITIES, ENTERTAINMENT"
        );
    }
}
