//! Application state for LinkHub.
//!
//! Wires both stores to one gateway and one notification channel, and
//! mirrors the owner identity into both on session changes. The stores
//! stay independently usable; this is convenience wiring for hosts.

use std::sync::Arc;

use crate::gateway::EntityGateway;
use crate::models::LinkView;
use crate::notify::Notifier;
use crate::stores::{CategoryStore, LinkStore};
use crate::views;

/// Shared state for an embedding application.
pub struct AppState {
    /// Link collection, synchronized remote-first.
    pub links: LinkStore,
    /// Category collection, synchronized remote-first.
    pub categories: CategoryStore,
}

impl AppState {
    /// Build both stores over a shared gateway and notifier.
    pub fn new(gateway: Arc<dyn EntityGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            links: LinkStore::new(gateway.clone(), notifier.clone()),
            categories: CategoryStore::new(gateway, notifier),
        }
    }

    /// Start a session: both stores discard state and fetch the
    /// owner's collections.
    pub async fn sign_in(&self, owner: impl Into<String>) {
        let owner = Some(owner.into());
        self.links.set_owner(owner.clone()).await;
        self.categories.set_owner(owner).await;
    }

    /// End the session: both stores empty out and stop loading.
    pub async fn sign_out(&self) {
        self.links.set_owner(None).await;
        self.categories.set_owner(None).await;
    }

    /// Compose the derived link views from the current snapshots.
    pub fn views(&self, search: &str, category: Option<&str>) -> Vec<LinkView> {
        views::compose(&self.links.links(), &self.categories.categories(), search, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::models::{CategoryDraft, LinkDraft};
    use crate::notify::MemoryNotifier;

    #[tokio::test]
    async fn sign_in_populates_and_sign_out_clears() {
        let state = AppState::new(
            Arc::new(MemoryGateway::new()),
            Arc::new(MemoryNotifier::new()),
        );

        state.sign_in("owner-1").await;
        let category = state
            .categories
            .add(CategoryDraft {
                name: "Work".into(),
                color: "#3b82f6".into(),
            })
            .await
            .unwrap();
        state
            .links
            .add(LinkDraft {
                title: "Jira".into(),
                url: "jira.example".into(),
                description: "tickets".into(),
                category_id: Some(category.id.clone()),
            })
            .await;

        let views = state.views("", None);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].category.as_ref().unwrap().name, "Work");

        state.sign_out().await;
        assert!(state.views("", None).is_empty());
        assert!(!state.links.is_loading());
        assert!(!state.categories.is_loading());
    }
}
