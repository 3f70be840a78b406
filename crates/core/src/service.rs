//! Service lifecycle constants and validation.
//!
//! A service bundles one or more templates for a specific client and
//! tracks where that client is in the intake flow.

use crate::error::CoreError;

/// Created, intake not yet sent.
pub const STATUS_DRAFT: &str = "draft";

/// Intake form delivered to the client.
pub const STATUS_INTAKE_SENT: &str = "intake_sent";

/// Client submitted their answers.
pub const STATUS_INTAKE_SUBMITTED: &str = "intake_submitted";

/// At least one document generated.
pub const STATUS_DOCUMENTS_READY: &str = "documents_ready";

/// Delivered and closed out.
pub const STATUS_COMPLETED: &str = "completed";

/// All valid service status values, in lifecycle order.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_INTAKE_SENT,
    STATUS_INTAKE_SUBMITTED,
    STATUS_DOCUMENTS_READY,
    STATUS_COMPLETED,
];

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid service status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}
