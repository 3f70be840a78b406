//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Update DTOs (all `Option` fields) where patches exist

pub mod artifact;
pub mod customer_override;
pub mod event;
pub mod intake;
pub mod service;
pub mod template;
