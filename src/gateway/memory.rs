//! In-memory entity gateway.
//!
//! Backs the stores without a network: rows live in per-owner maps and
//! the same id+owner scoping rules apply as on the real remote. Used
//! by tests and headless embedding.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::error::{Error, Result};
use crate::gateway::EntityGateway;
use crate::models::{self, Category, CategoryWrite, Link, LinkWrite};

#[derive(Default)]
struct Tables {
    // owner -> rows, insertion order
    links: HashMap<String, Vec<Link>>,
    categories: HashMap<String, Vec<Category>>,
}

/// Gateway holding all rows in process memory.
#[derive(Default)]
pub struct MemoryGateway {
    tables: Mutex<Tables>,
    seq: Mutex<i64>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic timestamps so creation order is observable even when
    /// several rows land within one clock tick.
    fn next_timestamp(&self) -> chrono::DateTime<Utc> {
        let mut seq = self.seq.lock().expect("gateway lock poisoned");
        *seq += 1;
        Utc::now() + Duration::milliseconds(*seq)
    }
}

#[async_trait]
impl EntityGateway for MemoryGateway {
    async fn list_links(&self, owner: &str) -> Result<Vec<Link>> {
        let tables = self.tables.lock().expect("gateway lock poisoned");
        let mut rows = tables.links.get(owner).cloned().unwrap_or_default();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_link(&self, owner: &str, write: &LinkWrite) -> Result<Link> {
        let ts = self.next_timestamp();
        let row = Link {
            id: models::new_id(),
            title: write.title.clone(),
            url: write.url.clone(),
            description: write.description.clone(),
            favicon_url: write.favicon_url.clone(),
            category_id: write.category_id.clone(),
            created_at: ts,
            updated_at: ts,
        };
        let mut tables = self.tables.lock().expect("gateway lock poisoned");
        tables
            .links
            .entry(owner.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update_link(&self, owner: &str, id: &str, write: &LinkWrite) -> Result<Link> {
        let ts = self.next_timestamp();
        let mut tables = self.tables.lock().expect("gateway lock poisoned");
        let rows = tables
            .links
            .get_mut(owner)
            .ok_or_else(|| Error::Gateway(format!("no such row: {}", id)))?;
        let row = rows
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| Error::Gateway(format!("no such row: {}", id)))?;
        row.title = write.title.clone();
        row.url = write.url.clone();
        row.description = write.description.clone();
        row.favicon_url = write.favicon_url.clone();
        row.category_id = write.category_id.clone();
        row.updated_at = ts;
        Ok(row.clone())
    }

    async fn delete_link(&self, owner: &str, id: &str) -> Result<()> {
        let mut tables = self.tables.lock().expect("gateway lock poisoned");
        if let Some(rows) = tables.links.get_mut(owner) {
            rows.retain(|l| l.id != id);
        }
        Ok(())
    }

    async fn list_categories(&self, owner: &str) -> Result<Vec<Category>> {
        let tables = self.tables.lock().expect("gateway lock poisoned");
        let mut rows = tables.categories.get(owner).cloned().unwrap_or_default();
        rows.sort_by_key(|c| c.name.to_lowercase());
        Ok(rows)
    }

    async fn insert_category(&self, owner: &str, write: &CategoryWrite) -> Result<Category> {
        let ts = self.next_timestamp();
        let row = Category {
            id: models::new_id(),
            name: write.name.clone(),
            color: write.color.clone(),
            created_at: ts,
            updated_at: ts,
        };
        let mut tables = self.tables.lock().expect("gateway lock poisoned");
        tables
            .categories
            .entry(owner.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update_category(
        &self,
        owner: &str,
        id: &str,
        write: &CategoryWrite,
    ) -> Result<Category> {
        let ts = self.next_timestamp();
        let mut tables = self.tables.lock().expect("gateway lock poisoned");
        let rows = tables
            .categories
            .get_mut(owner)
            .ok_or_else(|| Error::Gateway(format!("no such row: {}", id)))?;
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::Gateway(format!("no such row: {}", id)))?;
        row.name = write.name.clone();
        row.color = write.color.clone();
        row.updated_at = ts;
        Ok(row.clone())
    }

    async fn delete_category(&self, owner: &str, id: &str) -> Result<()> {
        let mut tables = self.tables.lock().expect("gateway lock poisoned");
        if let Some(rows) = tables.categories.get_mut(owner) {
            rows.retain(|c| c.id != id);
        }
        Ok(())
    }
}
