use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::documents::lifecycle::{Document, ParsingState, ParsingStatus};
use crate::documents::orchestrator::{ProcessOptions, ProcessOutcome};
use crate::errors::AppError;
use crate::models::profile::{Analysis, Content};
use crate::state::AppState;

const RATE_LIMIT_SCOPE: &str = "document-process";

#[derive(Debug, Default, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub job_keywords: Option<Vec<String>>,
    /// Run the pipeline inside the request and answer 200 once it finishes.
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub document_id: Uuid,
    pub outcome: ProcessOutcome,
    pub status: ParsingStatus,
}

impl ProcessResponse {
    fn new(document_id: Uuid, outcome: ProcessOutcome, status: ParsingStatus) -> Self {
        Self {
            document_id,
            outcome,
            status,
        }
    }
}

/// Status to report for `outcome`, reading the document back when the outcome
/// alone does not determine it.
async fn reported_status(
    state: &AppState,
    id: Uuid,
    outcome: ProcessOutcome,
) -> Result<ParsingStatus, AppError> {
    if let Some(status) = outcome.known_status() {
        return Ok(status);
    }
    state
        .documents
        .get(id)
        .await?
        .map(|document| document.status())
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub status: ParsingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        let status = document.status();
        let (content, analysis, error) = match document.state {
            ParsingState::Parsed { content, analysis } => (Some(content), Some(analysis), None),
            ParsingState::Error { message } => (None, None, message),
            ParsingState::NotStarted | ParsingState::Started => (None, None, None),
        };
        DocumentResponse {
            id: document.id,
            user_id: document.user_id,
            file_name: document.file_name,
            file_type: document.file_type,
            file_size: document.file_size,
            status,
            content,
            analysis,
            error,
            created_at: document.created_at,
            updated_at: document.updated_at,
        }
    }
}

/// POST /api/v1/documents/:id/process
/// 202 after the claim, or 200 after the full run when `wait` is set.
pub async fn handle_process_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<ProcessRequest>>,
) -> Result<(StatusCode, Json<ProcessResponse>), AppError> {
    let document = state
        .documents
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;

    state
        .rate_limiter
        .check(RATE_LIMIT_SCOPE, document.user_id)
        .await?;

    let Json(request) = body.unwrap_or_default();
    let options = ProcessOptions {
        job_keywords: request.job_keywords,
    };

    if request.wait {
        let outcome = state.orchestrator.process_document(id, options).await?;
        let status = reported_status(&state, id, outcome).await?;
        return Ok((StatusCode::OK, Json(ProcessResponse::new(id, outcome, status))));
    }

    let outcome = state.orchestrator.submit(id, options).await?;
    let status = reported_status(&state, id, outcome).await?;
    Ok((StatusCode::ACCEPTED, Json(ProcessResponse::new(id, outcome, status))))
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = state
        .documents
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;
    Ok(Json(document.into()))
}
