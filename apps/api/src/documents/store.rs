//! Document Store: persistence of documents and their lifecycle transitions.
//!
//! Every transition is a single statement guarded by the current status, so two
//! invocations racing on one document cannot both enter `STARTED`.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::documents::lifecycle::{Document, ParsingStatus};
use crate::errors::AppError;
use crate::models::document::DocumentRow;
use crate::models::profile::{Analysis, Content};

/// Result of trying to enter `STARTED`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// This caller owns the run. Carries the document as it was claimed.
    Claimed(Document),
    AlreadyInProgress,
    AlreadyParsed,
    NotFound,
}

/// Carried in the orchestrator and handlers as `Arc<dyn DocumentStore>`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError>;

    /// `NOT_STARTED | ERROR → STARTED`, atomically.
    async fn claim(&self, id: Uuid) -> Result<ClaimOutcome, AppError>;

    /// `STARTED → PARSED`, writing content and analysis in the same statement.
    /// Returns `false` when the document was no longer `STARTED` and nothing was written.
    async fn mark_parsed(
        &self,
        id: Uuid,
        content: &Content,
        analysis: &Analysis,
    ) -> Result<bool, AppError>;

    /// `STARTED → ERROR`. Clears any partial results.
    async fn mark_error(&self, id: Uuid, message: &str) -> Result<(), AppError>;
}

/// Maps a failed claim onto the reason it failed.
pub fn classify_unclaimed(current: Option<ParsingStatus>) -> ClaimOutcome {
    match current {
        None => ClaimOutcome::NotFound,
        Some(ParsingStatus::Parsed) => ClaimOutcome::AlreadyParsed,
        Some(status) => {
            if status.is_claimable() {
                // Another caller claimed and finished between the update and this read.
                debug!("Claim lost to a concurrent run (now {status})");
            }
            ClaimOutcome::AlreadyInProgress
        }
    }
}

fn into_document(row: DocumentRow) -> Result<Document, AppError> {
    Document::try_from(row).map_err(|e| AppError::Internal(e.into()))
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(into_document).transpose()
    }

    async fn claim(&self, id: Uuid) -> Result<ClaimOutcome, AppError> {
        let claimed = sqlx::query_as::<_, DocumentRow>(
            r#"
            UPDATE documents
            SET status = $2, error_message = NULL, updated_at = NOW()
            WHERE id = $1 AND status IN ($3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(ParsingStatus::Started.as_str())
        .bind(ParsingStatus::NotStarted.as_str())
        .bind(ParsingStatus::Error.as_str())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = claimed {
            return Ok(ClaimOutcome::Claimed(into_document(row)?));
        }

        let current = self.get(id).await?.map(|d| d.status());
        Ok(classify_unclaimed(current))
    }

    async fn mark_parsed(
        &self,
        id: Uuid,
        content: &Content,
        analysis: &Analysis,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET status = $2, content = $3, analysis = $4, error_message = NULL, updated_at = NOW()
            WHERE id = $1 AND status = $5
            "#,
        )
        .bind(id)
        .bind(ParsingStatus::Parsed.as_str())
        .bind(Json(content))
        .bind(Json(analysis))
        .bind(ParsingStatus::Started.as_str())
        .execute(&self.pool)
        .await?;

        let written = result.rows_affected() > 0;
        if !written {
            warn!("Document {id} left STARTED before its results were written; results dropped");
        }
        Ok(written)
    }

    async fn mark_error(&self, id: Uuid, message: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET status = $2, content = NULL, analysis = NULL, error_message = $3, updated_at = NOW()
            WHERE id = $1 AND status = $4
            "#,
        )
        .bind(id)
        .bind(ParsingStatus::Error.as_str())
        .bind(message)
        .bind(ParsingStatus::Started.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            warn!("Document {id} was not STARTED when marking ERROR");
        }
        Ok(())
    }
}
