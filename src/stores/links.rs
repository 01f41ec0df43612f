//! Link store: owner-scoped, remote-first synchronized link list.
//!
//! Ordering is newest-first by creation time: fetches arrive sorted
//! from the gateway and adds are prepended, never re-sorted. Two
//! generation guards keep late responses from clobbering newer state:
//! a fetch generation (a stale in-flight fetch is discarded) and a
//! per-entity generation (a stale update/remove completion is
//! discarded).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::gateway::EntityGateway;
use crate::models::{Link, LinkDraft, LinkWrite};
use crate::notify::{Notice, Notifier};
use crate::urls;

struct State {
    links: Vec<Link>,
    loading: bool,
    owner: Option<String>,
    /// Bumped by every fetch and every owner change.
    fetch_gen: u64,
    /// Bumped only by owner changes; in-flight mutations from a
    /// previous owner must not land in the next owner's list.
    owner_epoch: u64,
    /// Per-id mutation generations; a completion holding an old
    /// generation is discarded.
    entity_gen: HashMap<String, u64>,
}

/// In-memory list of the active owner's links, synchronized with the
/// gateway's `user_links` collection.
pub struct LinkStore {
    gateway: Arc<dyn EntityGateway>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<State>,
}

impl LinkStore {
    pub fn new(gateway: Arc<dyn EntityGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            state: Mutex::new(State {
                links: Vec::new(),
                loading: true,
                owner: None,
                fetch_gen: 0,
                owner_epoch: 0,
                entity_gen: HashMap::new(),
            }),
        }
    }

    fn locked(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("link store lock poisoned")
    }

    /// Current list snapshot, newest first.
    pub fn links(&self) -> Vec<Link> {
        self.locked().links.clone()
    }

    /// Whether the initial fetch for the current owner is outstanding.
    pub fn is_loading(&self) -> bool {
        self.locked().loading
    }

    /// The active owner identifier, if any.
    pub fn owner(&self) -> Option<String> {
        self.locked().owner.clone()
    }

    /// Switch the active owner and refetch from empty. A `None` owner
    /// means "no session": the list empties and loading terminates.
    pub async fn set_owner(&self, owner: Option<String>) {
        {
            let mut state = self.locked();
            if state.owner == owner {
                return;
            }
            state.owner = owner;
            state.links.clear();
            state.loading = true;
            state.owner_epoch += 1;
            state.fetch_gen += 1;
            state.entity_gen.clear();
        }
        self.fetch_all().await;
    }

    /// Replace the list with the gateway's current rows for the owner,
    /// newest first. On failure the previous list is kept.
    pub async fn fetch_all(&self) {
        let (owner, gen) = {
            let mut state = self.locked();
            match state.owner.clone() {
                None => {
                    state.links.clear();
                    state.loading = false;
                    return;
                }
                Some(owner) => {
                    state.fetch_gen += 1;
                    (owner, state.fetch_gen)
                }
            }
        };

        let result = self.gateway.list_links(&owner).await;

        let notice = {
            let mut state = self.locked();
            if state.fetch_gen != gen {
                debug!(gen, "stale link fetch discarded");
                return;
            }
            state.loading = false;
            match result {
                Ok(rows) => {
                    debug!(count = rows.len(), "link fetch applied");
                    state.links = rows;
                    None
                }
                Err(e) => {
                    warn!(error = %e, "link fetch failed");
                    Some(Notice::error("Error fetching links", e.to_string()))
                }
            }
        };
        if let Some(notice) = notice {
            self.notifier.notify(notice);
        }
    }

    /// Insert a link for the active owner and prepend the created row.
    /// No-op without an owner; on failure the list is unchanged.
    pub async fn add(&self, draft: LinkDraft) {
        let (owner, epoch) = {
            let state = self.locked();
            match state.owner.clone() {
                None => return,
                Some(owner) => (owner, state.owner_epoch),
            }
        };

        let write = Self::to_write(&draft);
        let notice = match self.gateway.insert_link(&owner, &write).await {
            Ok(row) => {
                let mut state = self.locked();
                if state.owner_epoch != epoch {
                    debug!("link add completed after owner change, discarded");
                    return;
                }
                state.links.insert(0, row);
                Notice::success("Link added", "Your link has been saved successfully.")
            }
            Err(e) => {
                warn!(error = %e, "link add failed");
                Notice::error("Error adding link", e.to_string())
            }
        };
        self.notifier.notify(notice);
    }

    /// Update a link scoped by id and owner, replacing the matching
    /// entry in place (list position preserved).
    pub async fn update(&self, id: &str, draft: LinkDraft) {
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
        let notice = match self.gateway.update_link(&owner, id, &write).await {
            Ok(row) => {
                let mut state = self.locked();
                if state.owner_epoch != epoch || state.entity_gen.get(id) != Some(&gen) {
                    debug!(id, "stale link update discarded");
                    return;
                }
                if let Some(slot) = state.links.iter_mut().find(|l| l.id == id) {
                    *slot = row;
                }
                Notice::success("Link updated", "Your link has been updated successfully.")
            }
            Err(e) => {
                warn!(error = %e, id, "link update failed");
                Notice::error("Error updating link", e.to_string())
            }
        };
        self.notifier.notify(notice);
    }

    /// Delete a link scoped by id and owner and drop it from the list.
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

        let notice = match self.gateway.delete_link(&owner, id).await {
            Ok(()) => {
                let mut state = self.locked();
                if state.owner_epoch != epoch || state.entity_gen.get(id) != Some(&gen) {
                    debug!(id, "stale link delete discarded");
                    return;
                }
                state.links.retain(|l| l.id != id);
                Notice::success("Link deleted", "Your link has been removed.")
            }
            Err(e) => {
                warn!(error = %e, id, "link delete failed");
                Notice::error("Error deleting link", e.to_string())
            }
        };
        self.notifier.notify(notice);
    }

    /// Normalize the URL, derive the favicon, and map empty optional
    /// fields to NULL.
    fn to_write(draft: &LinkDraft) -> LinkWrite {
        let url = urls::normalize_url(&draft.url);
        let favicon_url = urls::favicon_url(&url);
        let description = draft.description.trim();
        LinkWrite {
            title: draft.title.trim().to_string(),
            url,
            description: (!description.is_empty()).then(|| description.to_string()),
            favicon_url,
            category_id: draft.category_id.clone(),
        }
    }
}
