use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::documents::lifecycle::{Document, ParsingState};
use crate::errors::AppError;
use crate::evaluation::audit::record_job_match;
use crate::evaluation::job_match::{JobMatchRequest, JobMatchResult, ResumeContext};
use crate::models::user::user_exists;
use crate::state::AppState;

const RATE_LIMIT_SCOPE: &str = "job-match";

#[derive(Debug, Deserialize)]
pub struct JobMatchBody {
    pub user_id: Uuid,
    pub job_description: String,
    #[serde(default)]
    pub resume_skills: Option<Vec<String>>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub job_role: Option<String>,
    /// Parsed résumé to evaluate when no skills or text are given inline.
    #[serde(default)]
    pub document_id: Option<Uuid>,
    #[serde(default)]
    pub job_keywords: Vec<String>,
}

/// Checks that do not touch any backing service.
pub fn validate(body: &JobMatchBody) -> Result<(), AppError> {
    if body.job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description must not be empty".to_string()));
    }
    let has_inline_context = body
        .resume_skills
        .as_ref()
        .is_some_and(|skills| skills.iter().any(|s| !s.trim().is_empty()))
        || body.resume_text.as_ref().is_some_and(|t| !t.trim().is_empty());
    if !has_inline_context && body.document_id.is_none() {
        return Err(AppError::Validation(
            "one of resume_skills, resume_text or document_id is required".to_string(),
        ));
    }
    Ok(())
}

/// Inline skills win over inline text, which wins over the parsed document.
pub fn resolve_resume_context(
    body: &JobMatchBody,
    document: Option<&Document>,
) -> Result<ResumeContext, AppError> {
    if let Some(skills) = &body.resume_skills {
        let skills: Vec<String> = skills
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !skills.is_empty() {
            return Ok(ResumeContext::Skills(skills));
        }
    }
    if let Some(text) = body.resume_text.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok(ResumeContext::Text(text.to_string()));
    }
    match document.map(|d| &d.state) {
        Some(ParsingState::Parsed { content, .. }) if !content.skills.is_empty() => {
            Ok(ResumeContext::Skills(content.skills.clone()))
        }
        Some(ParsingState::Parsed { .. }) => Err(AppError::Validation(
            "the referenced document has no extracted skills".to_string(),
        )),
        Some(_) => Err(AppError::Validation(
            "the referenced document has not been parsed yet".to_string(),
        )),
        None => Err(AppError::Validation(
            "one of resume_skills, resume_text or document_id is required".to_string(),
        )),
    }
}

/// POST /api/v1/job-match
pub async fn handle_job_match(
    State(state): State<AppState>,
    Json(body): Json<JobMatchBody>,
) -> Result<Json<JobMatchResult>, AppError> {
    validate(&body)?;
    state.rate_limiter.check(RATE_LIMIT_SCOPE, body.user_id).await?;

    if !user_exists(&state.db, body.user_id).await? {
        return Err(AppError::NotFound(format!("User {} not found", body.user_id)));
    }

    let document = match body.document_id {
        Some(id) => {
            let document = state
                .documents
                .get(id)
                .await?
                .filter(|d| d.user_id == body.user_id)
                .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))?;
            Some(document)
        }
        None => None,
    };

    let request = JobMatchRequest {
        job_description: body.job_description.clone(),
        resume: resolve_resume_context(&body, document.as_ref())?,
        job_role: body.job_role.clone(),
        job_keywords: body.job_keywords.clone(),
    };

    let result = state.job_matcher.evaluate(&request).await;
    info!(
        "Job match for user {} via {} backend: score {}",
        body.user_id,
        state.job_matcher.backend(),
        result.match_score
    );

    record_job_match(
        &state.db,
        body.user_id,
        body.document_id,
        body.job_role.as_deref(),
        &result,
    )
    .await?;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{Analysis, Content};
    use chrono::Utc;

    fn body() -> JobMatchBody {
        JobMatchBody {
            user_id: Uuid::new_v4(),
            job_description: "Python and AWS".to_string(),
            resume_skills: None,
            resume_text: None,
            job_role: None,
            document_id: None,
            job_keywords: vec![],
        }
    }

    fn parsed_document(skills: &[&str]) -> Document {
        Document {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            storage_key: "k".to_string(),
            file_name: "cv.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 1,
            state: ParsingState::Parsed {
                content: Content {
                    skills: skills.iter().map(|s| s.to_string()).collect(),
                    ..Content::default()
                },
                analysis: Analysis::default(),
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_blank_job_description_is_rejected() {
        let body = JobMatchBody {
            job_description: "   ".to_string(),
            resume_text: Some("Python".to_string()),
            ..body()
        };
        assert!(matches!(validate(&body), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_missing_resume_context_is_rejected() {
        assert!(matches!(validate(&body()), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_inline_skills_take_precedence() {
        let body = JobMatchBody {
            resume_skills: Some(vec![" Python ".to_string(), "".to_string()]),
            resume_text: Some("SQL".to_string()),
            ..body()
        };
        assert_eq!(
            resolve_resume_context(&body, None).unwrap(),
            ResumeContext::Skills(vec!["Python".to_string()])
        );
    }

    #[test]
    fn test_parsed_document_supplies_skills() {
        let document = parsed_document(&["Rust", "Go"]);
        let body = JobMatchBody {
            document_id: Some(document.id),
            ..body()
        };
        assert_eq!(
            resolve_resume_context(&body, Some(&document)).unwrap(),
            ResumeContext::Skills(vec!["Rust".to_string(), "Go".to_string()])
        );
    }

    #[test]
    fn test_unparsed_document_is_rejected() {
        let mut document = parsed_document(&[]);
        document.state = ParsingState::Started;
        let body = JobMatchBody {
            document_id: Some(document.id),
            ..body()
        };
        assert!(matches!(
            resolve_resume_context(&body, Some(&document)),
            Err(AppError::Validation(_))
        ));
    }
}
