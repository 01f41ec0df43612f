//! Command dispatch palette.
//!
//! A secondary consumer over the same link/category state: a global
//! shortcut toggles it from anywhere, a live query filters links by
//! the same substring rule as the main view (over the palette's own
//! query), and selecting an entry routes through one exhaustive
//! action handler. The palette never reaches into store internals; it
//! re-dispatches the stores' own mutation entry points.

use tracing::warn;

use crate::models::{Category, Link};
use crate::stores::LinkStore;
use crate::urls::{self, UrlOpener};
use crate::views;

/// Display cap for matching links.
pub const MAX_LINK_RESULTS: usize = 8;

/// Key that toggles the palette when combined with Cmd/Ctrl.
pub const PALETTE_KEY: &str = "k";

/// What the user intends to do with a selected link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkIntent {
    Open,
    Edit,
    Delete,
}

/// A selectable palette action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteAction {
    AddLink,
    AddCategory,
    /// Category entries are presentation only: selecting one closes
    /// the palette and nothing else. Kept as an explicit no-op variant
    /// rather than inferring filtering behavior.
    Category(String),
    Link { id: String, intent: LinkIntent },
}

/// A rendered palette row, in display order.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteEntry {
    AddLink,
    AddCategory,
    Link(Link),
    Category(Category),
}

/// Dialog the presentation layer should open after a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogRequest {
    AddLink,
    AddCategory,
    EditLink(String),
}

/// Palette state: an open flag and its own search query, independent
/// of the main view's search text.
#[derive(Debug, Default)]
pub struct CommandPalette {
    open: bool,
    query: String,
}

impl CommandPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Global shortcut handler, fed from the outermost input layer so
    /// it fires regardless of focus. Returns whether the key event was
    /// consumed.
    pub fn handle_key(&mut self, key: &str, cmd_or_ctrl: bool) -> bool {
        if cmd_or_ctrl && key.eq_ignore_ascii_case(PALETTE_KEY) {
            self.toggle();
            return true;
        }
        false
    }

    /// Rows to display for the current query: the two fixed actions,
    /// then at most `MAX_LINK_RESULTS` matching links, then matching
    /// categories (by name).
    pub fn entries(&self, links: &[Link], categories: &[Category]) -> Vec<PaletteEntry> {
        let mut entries = vec![PaletteEntry::AddLink, PaletteEntry::AddCategory];

        entries.extend(
            links
                .iter()
                .filter(|link| views::link_matches(link, &self.query))
                .take(MAX_LINK_RESULTS)
                .cloned()
                .map(PaletteEntry::Link),
        );

        let query = self.query.to_lowercase();
        entries.extend(
            categories
                .iter()
                .filter(|c| query.is_empty() || c.name.to_lowercase().contains(&query))
                .cloned()
                .map(PaletteEntry::Category),
        );

        entries
    }

    /// Perform a selected action. Every dispatch closes the palette;
    /// dialog-opening intents are returned for the presentation layer.
    pub async fn dispatch(
        &mut self,
        action: PaletteAction,
        links: &LinkStore,
        opener: &dyn UrlOpener,
    ) -> Option<DialogRequest> {
        self.close();
        match action {
            PaletteAction::AddLink => Some(DialogRequest::AddLink),
            PaletteAction::AddCategory => Some(DialogRequest::AddCategory),
            PaletteAction::Category(_) => None,
            PaletteAction::Link { id, intent } => match intent {
                LinkIntent::Edit => Some(DialogRequest::EditLink(id)),
                LinkIntent::Delete => {
                    links.remove(&id).await;
                    None
                }
                LinkIntent::Open => {
                    let url = links.links().into_iter().find(|l| l.id == id).map(|l| l.url);
                    match url {
                        Some(url) => {
                            if let Err(e) = urls::open_external(&url, opener) {
                                warn!(error = %e, "refused to open link");
                            }
                        }
                        None => warn!(id = %id, "link vanished before open"),
                    }
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::models::LinkDraft;
    use crate::notify::MemoryNotifier;
    use std::sync::{Arc, Mutex};

    struct Recorder(Mutex<Vec<String>>);

    impl UrlOpener for Recorder {
        fn open(&self, url: &str) {
            self.0.lock().unwrap().push(url.to_string());
        }
    }

    fn recorder() -> Recorder {
        Recorder(Mutex::new(Vec::new()))
    }

    async fn seeded_store() -> LinkStore {
        let store = LinkStore::new(
            Arc::new(MemoryGateway::new()),
            Arc::new(MemoryNotifier::new()),
        );
        store.set_owner(Some("owner-1".into())).await;
        store
    }

    #[test]
    fn global_shortcut_toggles() {
        let mut palette = CommandPalette::new();
        assert!(!palette.is_open());

        assert!(palette.handle_key("k", true));
        assert!(palette.is_open());
        assert!(palette.handle_key("K", true));
        assert!(!palette.is_open());

        // Plain "k" and other combos pass through.
        assert!(!palette.handle_key("k", false));
        assert!(!palette.handle_key("p", true));
        assert!(!palette.is_open());
    }

    #[test]
    fn fixed_actions_always_listed_first() {
        let palette = CommandPalette::new();
        let entries = palette.entries(&[], &[]);
        assert_eq!(
            entries,
            vec![PaletteEntry::AddLink, PaletteEntry::AddCategory]
        );
    }

    #[test]
    fn query_filters_links_and_truncates() {
        let mut palette = CommandPalette::new();
        let links: Vec<Link> = (0..12)
            .map(|i| Link::new(format!("repo {}", i), "https://github.com"))
            .collect();

        palette.set_query("github");
        let entries = palette.entries(&links, &[]);
        let shown = entries
            .iter()
            .filter(|e| matches!(e, PaletteEntry::Link(_)))
            .count();
        assert_eq!(shown, MAX_LINK_RESULTS);

        palette.set_query("no such link");
        let entries = palette.entries(&links, &[]);
        assert!(!entries.iter().any(|e| matches!(e, PaletteEntry::Link(_))));
    }

    #[test]
    fn query_filters_categories_by_name() {
        let mut palette = CommandPalette::new();
        let categories = vec![
            Category::new("Work", "#3b82f6"),
            Category::new("Reading", "#10b981"),
        ];

        palette.set_query("read");
        let entries = palette.entries(&[], &categories);
        let names: Vec<&str> = entries
            .iter()
            .filter_map(|e| match e {
                PaletteEntry::Category(c) => Some(c.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, ["Reading"]);
    }

    #[tokio::test]
    async fn dispatch_add_actions_request_dialogs_and_close() {
        let store = seeded_store().await;
        let opener = recorder();
        let mut palette = CommandPalette::new();
        palette.toggle();

        let request = palette
            .dispatch(PaletteAction::AddLink, &store, &opener)
            .await;
        assert_eq!(request, Some(DialogRequest::AddLink));
        assert!(!palette.is_open());

        palette.toggle();
        let request = palette
            .dispatch(PaletteAction::AddCategory, &store, &opener)
            .await;
        assert_eq!(request, Some(DialogRequest::AddCategory));
        assert!(!palette.is_open());
    }

    #[tokio::test]
    async fn dispatch_category_is_inert_but_closes() {
        let store = seeded_store().await;
        let opener = recorder();
        let mut palette = CommandPalette::new();
        palette.toggle();

        let request = palette
            .dispatch(PaletteAction::Category("cat-1".into()), &store, &opener)
            .await;
        assert_eq!(request, None);
        assert!(!palette.is_open());
        assert!(opener.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dispatch_open_checks_scheme_before_navigating() {
        let store = seeded_store().await;
        store
            .add(LinkDraft {
                title: "Safe".into(),
                url: "https://example.com".into(),
                description: String::new(),
                category_id: None,
            })
            .await;
        let id = store.links()[0].id.clone();

        let opener = recorder();
        let mut palette = CommandPalette::new();
        palette
            .dispatch(
                PaletteAction::Link {
                    id,
                    intent: LinkIntent::Open,
                },
                &store,
                &opener,
            )
            .await;
        assert_eq!(
            opener.0.lock().unwrap().as_slice(),
            ["https://example.com"]
        );
    }

    #[tokio::test]
    async fn dispatch_delete_removes_through_the_store() {
        let store = seeded_store().await;
        store
            .add(LinkDraft {
                title: "Doomed".into(),
                url: "https://doomed.example".into(),
                description: String::new(),
                category_id: None,
            })
            .await;
        let id = store.links()[0].id.clone();

        let opener = recorder();
        let mut palette = CommandPalette::new();
        let request = palette
            .dispatch(
                PaletteAction::Link {
                    id,
                    intent: LinkIntent::Delete,
                },
                &store,
                &opener,
            )
            .await;
        assert_eq!(request, None);
        assert!(store.links().is_empty());
    }

    #[tokio::test]
    async fn dispatch_edit_requests_the_edit_dialog() {
        let store = seeded_store().await;
        let opener = recorder();
        let mut palette = CommandPalette::new();
        let request = palette
            .dispatch(
                PaletteAction::Link {
                    id: "link-9".into(),
                    intent: LinkIntent::Edit,
                },
                &store,
                &opener,
            )
            .await;
        assert_eq!(request, Some(DialogRequest::EditLink("link-9".into())));
    }
}
