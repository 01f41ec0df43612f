//! Entity stores for LinkHub.
//!
//! Each store owns the in-memory copy of one remote collection and is
//! the only writer to it. Mutations are remote-first: local state
//! changes only after the gateway confirms, so the in-memory list can
//! never diverge from a confirmed remote state. Failures are reported
//! through the notification channel, never raised past the operation.

mod categories;
mod links;

pub use categories::CategoryStore;
pub use links::LinkStore;
