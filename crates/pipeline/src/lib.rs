//! FormGen pipeline orchestration.
//!
//! Wires the leaf crates together into the two flows the product is
//! built around:
//!
//! - [`TemplateParser`] — handles the upload-completed trigger:
//!   claims the template, extracts text, runs AI field extraction, and
//!   persists the outcome. Safe under event redelivery.
//! - [`DocumentGenerator`] — substitutes client data into a template
//!   and records a new immutable artifact per run.
//! - [`PipelineRunner`] — the background task consuming bus events and
//!   feeding them to the parser.

mod generator;
mod parser;
mod render;
mod runner;

pub use generator::{DocumentGenerator, GenerateRequest, GenerationOutcome};
pub use parser::TemplateParser;
pub use render::render_docx;
pub use runner::PipelineRunner;

use formgen_core::CoreError;

/// Map a low-level database error into the domain error space.
pub(crate) fn db_err(e: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("Database error: {e}"))
}
