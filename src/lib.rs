//! LinkHub - owner-scoped link collection core.
//!
//! The client-side entity synchronization and derived-view layer: two
//! remote-first stores (links, categories), a pure view composer that
//! joins and filters their snapshots, and a command palette routing
//! actions over the same state.

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod palette;
pub mod state;
pub mod stores;
pub mod urls;
pub mod views;

pub use error::{Error, Result};
pub use state::AppState;
