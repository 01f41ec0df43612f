//! Remote entity gateway for LinkHub.
//!
//! The gateway is the single seam to the authoritative relational
//! store: two logical collections (`user_links`, `categories`), each
//! supporting select-all-by-owner, insert, update, and delete, every
//! call scoped by the owner identifier. Row-level ownership is
//! enforced remotely; the client only ever asks for its own rows.

mod memory;
mod rest;

pub use memory::MemoryGateway;
pub use rest::RestGateway;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Category, CategoryWrite, Link, LinkWrite};

/// CRUD access to the owner's two collections.
///
/// Implementations must return created/updated rows as stored remotely
/// (generated ids and timestamps included) — the stores never fabricate
/// rows locally.
#[async_trait]
pub trait EntityGateway: Send + Sync {
    /// All links owned by `owner`, newest first.
    async fn list_links(&self, owner: &str) -> Result<Vec<Link>>;

    /// Insert a link for `owner`; returns the created row.
    async fn insert_link(&self, owner: &str, write: &LinkWrite) -> Result<Link>;

    /// Update the link with `id` owned by `owner`; returns the updated row.
    async fn update_link(&self, owner: &str, id: &str, write: &LinkWrite) -> Result<Link>;

    /// Delete the link with `id` owned by `owner`.
    async fn delete_link(&self, owner: &str, id: &str) -> Result<()>;

    /// All categories owned by `owner`, by name ascending.
    async fn list_categories(&self, owner: &str) -> Result<Vec<Category>>;

    /// Insert a category for `owner`; returns the created row.
    async fn insert_category(&self, owner: &str, write: &CategoryWrite) -> Result<Category>;

    /// Update the category with `id` owned by `owner`; returns the updated row.
    async fn update_category(&self, owner: &str, id: &str, write: &CategoryWrite)
        -> Result<Category>;

    /// Delete the category with `id` owned by `owner`. No cascade:
    /// links referencing the category keep their now-dangling id.
    async fn delete_category(&self, owner: &str, id: &str) -> Result<()>;
}
