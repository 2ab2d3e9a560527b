//! Point categories: a grouping dimension for parallel point economies.
//!
//! Categories never hold an independently writable balance; every
//! per-category figure is derived from the transaction ledger at read time.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Validation errors raised by category constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    InvalidName,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "category name must not be empty"),
            Self::InvalidName => write!(
                f,
                "category name may only contain lowercase letters, digits, or hyphens"
            ),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

/// Unique lookup key for a category (e.g. `community`, `tools`, `reviews`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(name: impl Into<String>) -> Result<Self, CategoryValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        let valid = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(CategoryValidationError::InvalidName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known point category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
}

/// Ledger aggregation for one user within one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRollup {
    pub category_id: Uuid,
    pub earned: i64,
    pub spent: i64,
    pub transaction_count: i64,
    pub last_activity: Option<DateTime<Utc>>,
}

impl CategoryRollup {
    /// Net points available within the category.
    pub fn net(&self) -> i64 {
        self.earned - self.spent
    }

    /// Zero-activity rollup used when left-joining quiet categories.
    pub fn empty(category_id: Uuid) -> Self {
        Self {
            category_id,
            earned: 0,
            spent: 0,
            transaction_count: 0,
            last_activity: None,
        }
    }
}

/// A category paired with the caller's derived point figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPointsSummary {
    pub category: Category,
    pub earned: i64,
    pub spent: i64,
    pub net: i64,
    pub transaction_count: i64,
    pub last_activity: Option<DateTime<Utc>>,
}

impl CategoryPointsSummary {
    /// Combine a category with its (possibly empty) rollup.
    pub fn from_rollup(category: Category, rollup: &CategoryRollup) -> Self {
        Self {
            category,
            earned: rollup.earned,
            spent: rollup.spent,
            net: rollup.net(),
            transaction_count: rollup.transaction_count,
            last_activity: rollup.last_activity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("tools")]
    #[case("community-events")]
    #[case("tier2")]
    fn valid_names_are_accepted(#[case] raw: &str) {
        let name = CategoryName::new(raw).expect("valid name");
        assert_eq!(name.as_str(), raw);
    }

    #[rstest]
    #[case("", CategoryValidationError::EmptyName)]
    #[case("Tools", CategoryValidationError::InvalidName)]
    #[case("with space", CategoryValidationError::InvalidName)]
    fn invalid_names_are_rejected(#[case] raw: &str, #[case] expected: CategoryValidationError) {
        assert_eq!(CategoryName::new(raw), Err(expected));
    }

    #[rstest]
    fn rollup_net_subtracts_spends() {
        let rollup = CategoryRollup {
            category_id: Uuid::new_v4(),
            earned: 120,
            spent: 45,
            transaction_count: 7,
            last_activity: Some(Utc::now()),
        };
        assert_eq!(rollup.net(), 75);
    }

    #[rstest]
    fn empty_rollup_reports_zeroes() {
        let rollup = CategoryRollup::empty(Uuid::new_v4());
        assert_eq!(rollup.net(), 0);
        assert_eq!(rollup.transaction_count, 0);
        assert!(rollup.last_activity.is_none());
    }
}
