//! HTTP request handlers, grouped by resource.

pub mod artifacts;
pub mod events;
pub mod generation;
pub mod overrides;
pub mod services;
pub mod templates;
pub mod uploads;
