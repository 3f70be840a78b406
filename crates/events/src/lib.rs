//! FormGen event bus and durable event capture.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] — the canonical domain event envelope, including
//!   the upload-completed trigger the parsing pipeline consumes.
//! - [`EventPersistence`] — background service that writes every event
//!   to the `events` table.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::EventPersistence;
