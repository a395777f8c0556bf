use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::job_match::JobMatchResult;
use crate::models::document::JobMatchAuditRow;

/// Appends one job-match evaluation to `job_match_audits`.
pub async fn record_job_match(
    pool: &PgPool,
    user_id: Uuid,
    document_id: Option<Uuid>,
    job_role: Option<&str>,
    result: &JobMatchResult,
) -> Result<JobMatchAuditRow, AppError> {
    let row = sqlx::query_as::<_, JobMatchAuditRow>(
        r#"
        INSERT INTO job_match_audits
            (id, user_id, document_id, match_score, missing_keywords, job_role)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(document_id)
    .bind(result.match_score as i32)
    .bind(&result.missing_keywords)
    .bind(job_role)
    .fetch_one(pool)
    .await?;

    info!(
        "Recorded job match {} for user {user_id} (score {})",
        row.id, row.match_score
    );
    Ok(row)
}
