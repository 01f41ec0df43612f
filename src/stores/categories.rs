//! Category store: owner-scoped, remote-first synchronized categories.
//!
//! Structurally the link store over the `categories` collection, with
//! one difference: the list is re-sorted by name (case-insensitive,
//! ascending) after every membership- or name-changing success —
//! insertion order is never trusted. Deleting a category does not
//! cascade to links that reference it; dangling ids are tolerated and
//! resolved to "no category" by the view composer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::gateway::EntityGateway;
use crate::models::{name_sort_key, Category, CategoryDraft, CategoryWrite};
use crate::notify::{Notice, Notifier};

struct State {
    categories: Vec<Category>,
    loading: bool,
    owner: Option<String>,
    fetch_gen: u64,
    owner_epoch: u64,
    entity_gen: HashMap<String, u64>,
}

/// In-memory list of the active owner's categories, synchronized with
/// the gateway's `categories` collection.
pub struct CategoryStore {
    gateway: Arc<dyn EntityGateway>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<State>,
}

impl CategoryStore {
    pub fn new(gateway: Arc<dyn EntityGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            state: Mutex::new(State {
                categories: Vec::new(),
                loading: true,
                owner: None,
                fetch_gen: 0,
                owner_epoch: 0,
                entity_gen: HashMap::new(),
            }),
        }
    }

    fn locked(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("category store lock poisoned")
    }

    /// Current list snapshot, sorted by name ascending.
    pub fn categories(&self) -> Vec<Category> {
        self.locked().categories.clone()
    }

    /// Whether the initial fetch for the current owner is outstanding.
    pub fn is_loading(&self) -> bool {
        self.locked().loading
    }

    /// The active owner identifier, if any.
    pub fn owner(&self) -> Option<String> {
        self.locked().owner.clone()
    }

    /// Switch the active owner and refetch from empty.
    pub async fn set_owner(&self, owner: Option<String>) {
        {
            let mut state = self.locked();
            if state.owner == owner {
                return;
            }
            state.owner = owner;
            state.categories.clear();
            state.loading = true;
            state.owner_epoch += 1;
            state.fetch_gen += 1;
            state.entity_gen.clear();
        }
        self.fetch_all().await;
    }

    /// Replace the list with the gateway's rows for the owner. On
    /// failure the previous list is kept.
    pub async fn fetch_all(&self) {
        let (owner, gen) = {
            let mut state = self.locked();
            match state.owner.clone() {
                None => {
                    state.categories.clear();
                    state.loading = false;
                    return;
                }
                Some(owner) => {
                    state.fetch_gen += 1;
                    (owner, state.fetch_gen)
                }
            }
        };

        let result = self.gateway.list_categories(&owner).await;

        let notice = {
            let mut state = self.locked();
            if state.fetch_gen != gen {
                debug!(gen, "stale category fetch discarded");
                return;
            }
            state.loading = false;
            match result {
                Ok(rows) => {
                    debug!(count = rows.len(), "category fetch applied");
                    state.categories = rows;
                    state.categories.sort_by_key(name_sort_key);
                    None
                }
                Err(e) => {
                    warn!(error = %e, "category fetch failed");
                    Some(Notice::error("Error fetching categories", e.to_string()))
                }
            }
        };
        if let Some(notice) = notice {
            self.notifier.notify(notice);
        }
    }

    /// Insert a category for the active owner. Returns the created row
    /// on success so a dialog can select it immediately.
    pub async fn add(&self, draft: CategoryDraft) -> Option<Category> {
        let (owner, epoch) = {
            let state = self.locked();
            match state.owner.clone() {
                None => return None,
                Some(owner) => (owner, state.owner_epoch),
            }
        };

        let write = Self::to_write(&draft);
        match self.gateway.insert_category(&owner, &write).await {
            Ok(row) => {
                {
                    let mut state = self.locked();
                    if state.owner_epoch != epoch {
                        debug!("category add completed after owner change, discarded");
                        return None;
                    }
                    state.categories.push(row.clone());
                    state.categories.sort_by_key(name_sort_key);
                }
                self.notifier.notify(Notice::success(
                    "Category added",
                    "Your category has been created successfully.",
                ));
                Some(row)
            }
            Err(e) => {
                warn!(error = %e, "category add failed");
                self.notifier
                    .notify(Notice::error("Error adding category", e.to_string()));
                None
            }
        }
    }

    /// Update a category scoped by id and owner, then re-sort by name.
    pub async fn update(&self, id: &str, draft: CategoryDraft) {
        let (owner, epoch, gen) = {
            let mut state = self.locked();
            match state.owner.clone() {
                None => return,
                Some(owner) => {
                    let epoch = state.owner_epoch;
                    let gen = state.entity_gen.entry(id.to_string()).or_insert(0);
                    *gen += 1;
                    (owner, epoch, *gen)
                }
            }
        };

        let write = Self::to_write(&draft);
        let notice = match self.gateway.update_category(&owner, id, &write).await {
            Ok(row) => {
                let mut state = self.locked();
                if state.owner_epoch != epoch || state.entity_gen.get(id) != Some(&gen) {
                    debug!(id, "stale category update discarded");
                    return;
                }
                if let Some(slot) = state.categories.iter_mut().find(|c| c.id == id) {
                    *slot = row;
                }
                state.categories.sort_by_key(name_sort_key);
                Notice::success(
                    "Category updated",
                    "Your category has been updated successfully.",
                )
            }
            Err(e) => {
                warn!(error = %e, id, "category update failed");
                Notice::error("Error updating category", e.to_string())
            }
        };
        self.notifier.notify(notice);
    }

    /// Delete a category by id. Links referencing it keep their
    /// dangling id.
    pub async fn remove(&self, id: &str) {
        let (owner, epoch, gen) = {
            let mut state = self.locked();
            match state.owner.clone() {
                None => return,
                Some(owner) => {
                    let epoch = state.owner_epoch;
                    let gen = state.entity_gen.entry(id.to_string()).or_insert(0);
                    *gen += 1;
                    (owner, epoch, *gen)
                }
            }
        };

        let notice = match self.gateway.delete_category(&owner, id).await {
            Ok(()) => {
                let mut state = self.locked();
                if state.owner_epoch != epoch || state.entity_gen.get(id) != Some(&gen) {
                    debug!(id, "stale category delete discarded");
                    return;
                }
                state.categories.retain(|c| c.id != id);
                Notice::success("Category deleted", "Your category has been removed.")
            }
            Err(e) => {
                warn!(error = %e, id, "category delete failed");
                Notice::error("Error deleting category", e.to_string())
            }
        };
        self.notifier.notify(notice);
    }

    fn to_write(draft: &CategoryDraft) -> CategoryWrite {
        CategoryWrite {
            name: draft.name.trim().to_string(),
            color: draft.color.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::notify::MemoryNotifier;

    fn store() -> (Arc<MemoryGateway>, Arc<MemoryNotifier>, CategoryStore) {
        let gateway = Arc::new(MemoryGateway::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let store = CategoryStore::new(gateway.clone(), notifier.clone());
        (gateway, notifier, store)
    }

    fn draft(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.into(),
            color: "#3b82f6".into(),
        }
    }

    fn names(store: &CategoryStore) -> Vec<String> {
        store.categories().into_iter().map(|c| c.name).collect()
    }

    #[tokio::test]
    async fn add_keeps_list_sorted_case_insensitively() {
        let (_, _, store) = store();
        store.set_owner(Some("owner-1".into())).await;

        store.add(draft("zeta")).await;
        store.add(draft("Alpha")).await;
        store.add(draft("mid")).await;

        assert_eq!(names(&store), ["Alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn add_returns_the_created_row() {
        let (_, _, store) = store();
        store.set_owner(Some("owner-1".into())).await;

        let created = store.add(draft("Work")).await.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.name, "Work");
    }

    #[tokio::test]
    async fn rename_re_sorts() {
        let (_, _, store) = store();
        store.set_owner(Some("owner-1".into())).await;
        store.add(draft("aaa")).await;
        let renamed = store.add(draft("bbb")).await.unwrap();
        store.add(draft("ccc")).await;

        store
            .update(
                &renamed.id,
                CategoryDraft {
                    name: "zzz".into(),
                    color: "#ef4444".into(),
                },
            )
            .await;

        assert_eq!(names(&store), ["aaa", "ccc", "zzz"]);
    }

    #[tokio::test]
    async fn duplicate_names_are_allowed() {
        let (_, _, store) = store();
        store.set_owner(Some("owner-1".into())).await;
        store.add(draft("Same")).await;
        store.add(draft("Same")).await;
        assert_eq!(store.categories().len(), 2);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_list_untouched() {
        let (_, notifier, store) = store();
        store.set_owner(Some("owner-1".into())).await;
        store.add(draft("Keep")).await;
        notifier.drain();

        let before = store.categories();
        store.update("missing-id", draft("nope")).await;

        assert_eq!(store.categories(), before);
        assert_eq!(notifier.notices()[0].title, "Error updating category");
    }

    #[tokio::test]
    async fn remove_deletes_by_id_only() {
        let (_, _, store) = store();
        store.set_owner(Some("owner-1".into())).await;
        let work = store.add(draft("Work")).await.unwrap();
        store.add(draft("Home")).await;

        store.remove(&work.id).await;
        assert_eq!(names(&store), ["Home"]);
    }

    #[tokio::test]
    async fn no_owner_is_a_no_op() {
        let (_, notifier, store) = store();
        assert!(store.add(draft("X")).await.is_none());
        store.update("id", draft("Y")).await;
        store.remove("id").await;
        assert!(store.categories().is_empty());
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn owner_change_discards_and_refetches() {
        let (_, _, store) = store();
        store.set_owner(Some("owner-a".into())).await;
        store.add(draft("A's category")).await;

        store.set_owner(Some("owner-b".into())).await;
        assert!(store.categories().is_empty());

        store.set_owner(Some("owner-a".into())).await;
        assert_eq!(names(&store), ["A's category"]);
    }
}
