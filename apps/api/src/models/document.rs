use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Raw `documents` row. Converted into `documents::lifecycle::Document` before use;
/// nothing outside the store reads `status` as a string.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub storage_key: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub status: String,
    pub content: Option<Value>,
    pub analysis: Option<Value>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One persisted job-match evaluation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobMatchAuditRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_id: Option<Uuid>,
    pub match_score: i32,
    pub missing_keywords: Vec<String>,
    pub job_role: Option<String>,
    pub created_at: DateTime<Utc>,
}
