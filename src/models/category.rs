//! Category model.
//!
//! Categories label links within a single owner's collection. Name
//! uniqueness is not enforced; ordering is always by name,
//! case-insensitive, ascending.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed color palette offered by the presentation layer. Arbitrary
/// colors remain legal; the store does not validate against this list.
pub const CATEGORY_COLORS: [&str; 10] = [
    "#3b82f6", // blue
    "#10b981", // emerald
    "#8b5cf6", // violet
    "#f59e0b", // amber
    "#ef4444", // red
    "#06b6d4", // cyan
    "#84cc16", // lime
    "#f97316", // orange
    "#ec4899", // pink
    "#6366f1", // indigo
];

/// A link category, as stored by the remote gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a category with generated id and timestamps (test and
    /// in-memory gateway use).
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = super::now();
        Self {
            id: super::new_id(),
            name: name.into(),
            color: color.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller-supplied fields for creating or updating a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub color: String,
}

/// Wire record for category insert/update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWrite {
    pub name: String,
    pub color: String,
}

/// Sort key for the always-sorted category list.
pub fn name_sort_key(category: &Category) -> String {
    category.name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_ten_distinct_colors() {
        let mut colors: Vec<&str> = CATEGORY_COLORS.to_vec();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 10);
    }

    #[test]
    fn sort_key_is_case_insensitive() {
        let a = Category::new("apple", "#ef4444");
        let b = Category::new("Banana", "#f59e0b");
        assert!(name_sort_key(&a) < name_sort_key(&b));
    }
}
