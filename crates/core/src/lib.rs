//! FormGen domain core.
//!
//! Pure domain logic shared by every other crate: entity status state
//! machines, the typed form-field model, case/format-tolerant key
//! matching, the placeholder substitution engine, and override rules.
//! Nothing in here performs I/O.

pub mod assembly;
pub mod error;
pub mod field;
pub mod hashing;
pub mod matching;
pub mod overrides;
pub mod service;
pub mod template;
pub mod types;

pub use error::CoreError;
