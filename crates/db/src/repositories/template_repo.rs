//! Repository for the `templates` table.
//!
//! Lifecycle writes are status-guarded single statements so that
//! redelivered upload events and racing reviewers cannot produce lost
//! updates: a claim that matches zero rows means someone else got
//! there first (or the template is in a terminal status), and the
//! caller observes that instead of overwriting.

use sqlx::PgPool;

use formgen_core::template::{
    STATUS_ERROR, STATUS_PARSED, STATUS_PARSING, STATUS_UPLOADED, UPLOAD_TOKEN_TTL_MINUTES,
};
use formgen_core::types::DbId;

use crate::models::template::{CreateTemplate, Template, UpdateTemplate};

const COLUMNS: &str = "id, public_id, name, original_file_name, file_type, storage_path, \
     status, extracted_fields, error_message, version, content_hash, upload_token, \
     upload_token_expires_at, locked_by, locked_at, lock_expires_at, created_at, updated_at";

/// Provides lifecycle and CRUD operations for templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Register a new upload: insert the row as `uploaded` with a fresh
    /// upload token valid for [`UPLOAD_TOKEN_TTL_MINUTES`].
    pub async fn create(
        pool: &PgPool,
        public_id: &str,
        upload_token: &str,
        input: &CreateTemplate,
    ) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates \
                (public_id, name, original_file_name, file_type, upload_token, \
                 upload_token_expires_at) \
             VALUES ($1, $2, $3, $4, $5, NOW() + make_interval(mins => $6)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(public_id)
            .bind(&input.name)
            .bind(&input.original_file_name)
            .bind(&input.file_type)
            .bind(upload_token)
            .bind(UPLOAD_TOKEN_TTL_MINUTES as i32)
            .fetch_one(pool)
            .await
    }

    /// Find a template by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a template by public ID.
    pub async fn find_by_public_id(
        pool: &PgPool,
        public_id: &str,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE public_id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(public_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the template owning an outstanding upload token.
    pub async fn find_by_upload_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE upload_token = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// List all templates, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates ORDER BY created_at DESC");
        sqlx::query_as::<_, Template>(&query).fetch_all(pool).await
    }

    /// Record that the uploaded bytes landed in storage: set the object
    /// path and content hash, consume the upload token.
    pub async fn record_upload(
        pool: &PgPool,
        id: DbId,
        storage_path: &str,
        content_hash: &str,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                storage_path = $2, \
                content_hash = $3, \
                upload_token = NULL, \
                upload_token_expires_at = NULL, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(storage_path)
            .bind(content_hash)
            .fetch_optional(pool)
            .await
    }

    /// Claim a template for parsing.
    ///
    /// Succeeds from `uploaded` (the normal path) and re-entrantly from
    /// `parsing` (a redelivered upload event re-claims and safely
    /// re-does the idempotent work). Returns `None` when the template
    /// is in a terminal status — the redelivery is then a no-op.
    pub async fn claim_parsing(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        Self::transition_to_parsing(pool, id, &[STATUS_UPLOADED, STATUS_PARSING]).await
    }

    /// Explicit re-parse: restart at `parsing` from a terminal status
    /// (or re-claim an in-flight one). This is the only path out of
    /// `parsed`/`error`.
    pub async fn begin_reparse(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        Self::transition_to_parsing(
            pool,
            id,
            &[STATUS_UPLOADED, STATUS_PARSING, STATUS_PARSED, STATUS_ERROR],
        )
        .await
    }

    async fn transition_to_parsing(
        pool: &PgPool,
        id: DbId,
        allowed_from: &[&str],
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                status = '{STATUS_PARSING}', \
                error_message = NULL, \
                updated_at = NOW() \
             WHERE id = $1 AND status = ANY($2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(allowed_from)
            .fetch_optional(pool)
            .await
    }

    /// Persist extracted fields and move `parsing -> parsed`. Guarded:
    /// a template no longer in `parsing` is left untouched.
    pub async fn store_parsed(
        pool: &PgPool,
        id: DbId,
        fields: &serde_json::Value,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                status = '{STATUS_PARSED}', \
                extracted_fields = $2, \
                error_message = NULL, \
                updated_at = NOW() \
             WHERE id = $1 AND status = '{STATUS_PARSING}' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(fields)
            .fetch_optional(pool)
            .await
    }

    /// Record an extraction failure and move `parsing -> error`.
    pub async fn store_error(
        pool: &PgPool,
        id: DbId,
        message: &str,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                status = '{STATUS_ERROR}', \
                error_message = $2, \
                updated_at = NOW() \
             WHERE id = $1 AND status = '{STATUS_PARSING}' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(message)
            .fetch_optional(pool)
            .await
    }

    /// Metadata edit with optimistic concurrency: the update applies
    /// only when the caller's version stamp still matches, and bumps
    /// the version. `None` means the stamp was stale (conflict).
    pub async fn update_metadata(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                name = COALESCE($3, name), \
                version = version + 1, \
                updated_at = NOW() \
             WHERE id = $1 AND version = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(input.version)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Acquire (or refresh) the editor lock. Succeeds when the lock is
    /// free, expired, or already held by the same holder. `None` means
    /// another editor holds a live lock.
    pub async fn acquire_lock(
        pool: &PgPool,
        id: DbId,
        holder: &str,
        ttl_minutes: i64,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET \
                locked_by = $2, \
                locked_at = NOW(), \
                lock_expires_at = NOW() + make_interval(mins => $3), \
                updated_at = NOW() \
             WHERE id = $1 \
               AND (locked_by IS NULL OR locked_by = $2 OR lock_expires_at < NOW()) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(holder)
            .bind(ttl_minutes as i32)
            .fetch_optional(pool)
            .await
    }

    /// Release the editor lock, if held by `holder`.
    pub async fn release_lock(
        pool: &PgPool,
        id: DbId,
        holder: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE templates SET \
                locked_by = NULL, locked_at = NULL, lock_expires_at = NULL, \
                updated_at = NOW() \
             WHERE id = $1 AND locked_by = $2",
        )
        .bind(id)
        .bind(holder)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
