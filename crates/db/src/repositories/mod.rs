//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod artifact_repo;
pub mod customer_override_repo;
pub mod event_repo;
pub mod intake_repo;
pub mod service_repo;
pub mod template_repo;

pub use artifact_repo::ArtifactRepo;
pub use customer_override_repo::CustomerOverrideRepo;
pub use event_repo::EventRepo;
pub use intake_repo::IntakeRepo;
pub use service_repo::ServiceRepo;
pub use template_repo::TemplateRepo;
