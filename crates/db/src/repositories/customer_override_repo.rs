//! Repository for the `customer_overrides` table.
//!
//! Review decisions are single status-guarded updates: two racing
//! reviewers cannot both win, the loser observes zero rows and maps
//! that to an invalid-state error at the handler.

use sqlx::PgPool;

use formgen_core::overrides::{STATUS_APPROVED, STATUS_PENDING};
use formgen_core::types::DbId;

use crate::models::customer_override::{CreateOverride, CustomerOverride};

const COLUMNS: &str =
    "id, public_id, service_id, kind, payload, status, reviewed_by, reviewed_at, created_at";

/// Provides override submission and review operations.
pub struct CustomerOverrideRepo;

impl CustomerOverrideRepo {
    /// Insert a customer-submitted override. Always lands `pending`;
    /// there is no path that creates an approved override directly.
    pub async fn create(
        pool: &PgPool,
        public_id: &str,
        service_id: DbId,
        input: &CreateOverride,
    ) -> Result<CustomerOverride, sqlx::Error> {
        let query = format!(
            "INSERT INTO customer_overrides (public_id, service_id, kind, payload) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomerOverride>(&query)
            .bind(public_id)
            .bind(service_id)
            .bind(&input.kind)
            .bind(&input.payload)
            .fetch_one(pool)
            .await
    }

    /// Find an override by public ID.
    pub async fn find_by_public_id(
        pool: &PgPool,
        public_id: &str,
    ) -> Result<Option<CustomerOverride>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customer_overrides WHERE public_id = $1");
        sqlx::query_as::<_, CustomerOverride>(&query)
            .bind(public_id)
            .fetch_optional(pool)
            .await
    }

    /// Record a review decision (`approved` or `rejected`), guarded on
    /// the override still being `pending`. `None` means it was not
    /// pending — already reviewed, possibly by a racing request.
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        decision: &str,
        reviewer: &str,
    ) -> Result<Option<CustomerOverride>, sqlx::Error> {
        let query = format!(
            "UPDATE customer_overrides SET \
                status = $2, \
                reviewed_by = $3, \
                reviewed_at = NOW() \
             WHERE id = $1 AND status = '{STATUS_PENDING}' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomerOverride>(&query)
            .bind(id)
            .bind(decision)
            .bind(reviewer)
            .fetch_optional(pool)
            .await
    }

    /// List a service's overrides, newest first.
    pub async fn list_for_service(
        pool: &PgPool,
        service_id: DbId,
    ) -> Result<Vec<CustomerOverride>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customer_overrides \
             WHERE service_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, CustomerOverride>(&query)
            .bind(service_id)
            .fetch_all(pool)
            .await
    }

    /// The approved overrides generation consumes, oldest first so
    /// later approvals layer on earlier ones.
    pub async fn list_approved_for_service(
        pool: &PgPool,
        service_id: DbId,
    ) -> Result<Vec<CustomerOverride>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customer_overrides \
             WHERE service_id = $1 AND status = '{STATUS_APPROVED}' \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, CustomerOverride>(&query)
            .bind(service_id)
            .fetch_all(pool)
            .await
    }
}
