//! Data models for LinkHub.
//!
//! Defines the two owned collections (links, categories), the write
//! records sent to the remote gateway, and the derived view types.

mod category;
mod link;

pub use category::*;
pub use link::*;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new UUID
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
