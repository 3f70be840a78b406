//! HTTP API for the template and document generation service.
//!
//! Exposes the template upload lifecycle, service and intake
//! management, the override review workflow, and synchronous document
//! generation over a JSON REST surface. The binary in `main.rs` wires
//! the full stack: database pool, blob storage, event bus, and the
//! background parsing pipeline.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
