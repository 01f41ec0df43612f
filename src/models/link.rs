//! Link model and derived view types.
//!
//! A link belongs to exactly one owner and may carry an optional
//! reference to one of that owner's categories. The reference is
//! resolved at view-composition time, never stored resolved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Category;

/// A saved web link, as stored by the remote gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub favicon_url: Option<String>,
    /// Nullable foreign key into the owner's categories. May dangle
    /// after a category delete; views resolve a dangling id to `None`.
    pub category_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Create a link with generated id and timestamps (test and
    /// in-memory gateway use; real rows come back from the remote).
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let now = super::now();
        Self {
            id: super::new_id(),
            title: title.into(),
            url: url.into(),
            description: None,
            favicon_url: None,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller-supplied fields for creating or updating a link.
///
/// Validation (non-empty title/url) is the caller's responsibility;
/// the store normalizes the URL and derives the favicon itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkDraft {
    pub title: String,
    pub url: String,
    pub description: String,
    pub category_id: Option<String>,
}

/// Wire record for link insert/update, owner stamped in by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkWrite {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub favicon_url: Option<String>,
    pub category_id: Option<String>,
}

/// Resolved category fields carried by a derived view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: String,
    pub color: String,
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            color: category.color.clone(),
        }
    }
}

/// A link joined to its resolved category, computed per composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkView {
    #[serde(flatten)]
    pub link: Link,
    pub category: Option<CategoryRef>,
}
