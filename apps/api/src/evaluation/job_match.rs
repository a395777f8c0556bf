//! Job-Match Evaluator: pluggable, trait-based comparison of a résumé against a job description.
//!
//! `LlmJobMatcher` asks the Structured-Response Generator for the full evaluation.
//! `KeywordJobMatcher` is the deterministic fallback used when no model is configured.
//!
//! Every backend's output goes through `finalize`, so the score is always within
//! 0–100 and suggestions are always empty at or below the threshold.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::keywords::{contains_keyword, dedup_terms};
use crate::analysis::skills::find_known_skills;
use crate::evaluation::prompts::{job_match_prompt, job_match_system, SUGGESTION_THRESHOLD};
use crate::llm_client::{parse_structured, LlmError, StructuredResponseGenerator};

// ────────────────────────────────────────────────────────────────────────────
// Request / result models (shared across all matcher backends)
// ────────────────────────────────────────────────────────────────────────────

/// What the caller knows about the candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeContext {
    Skills(Vec<String>),
    Text(String),
}

impl ResumeContext {
    fn label(&self) -> &'static str {
        match self {
            ResumeContext::Skills(_) => "Résumé skills",
            ResumeContext::Text(_) => "Résumé text",
        }
    }

    fn render(&self) -> String {
        match self {
            ResumeContext::Skills(skills) => skills.join(", "),
            ResumeContext::Text(text) => text.clone(),
        }
    }

    fn covers(&self, keyword: &str) -> bool {
        match self {
            ResumeContext::Skills(skills) => skills.iter().any(|skill| {
                skill.trim().eq_ignore_ascii_case(keyword.trim())
                    || contains_keyword(skill, keyword)
            }),
            ResumeContext::Text(text) => contains_keyword(text, keyword),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobMatchRequest {
    pub job_description: String,
    pub resume: ResumeContext,
    pub job_role: Option<String>,
    /// Keywords the caller already pulled from the job description.
    pub job_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchResult {
    pub match_score: u32,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendations: String,
}

impl JobMatchResult {
    /// Result returned when evaluation could not be performed.
    pub fn zero() -> Self {
        Self::default()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Carried in `AppState` as `Arc<dyn JobMatcher>`. Never fails: an evaluation
/// that cannot be performed yields `JobMatchResult::zero()`.
#[async_trait]
pub trait JobMatcher: Send + Sync {
    /// "llm" | "keyword", for logs and audit.
    fn backend(&self) -> &'static str;

    async fn evaluate(&self, request: &JobMatchRequest) -> JobMatchResult;
}

// ────────────────────────────────────────────────────────────────────────────
// Post-processing
// ────────────────────────────────────────────────────────────────────────────

/// Model output before normalisation. Scores arrive as integers, floats or strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawJobMatch {
    #[serde(deserialize_with = "lenient_score")]
    match_score: f64,
    missing_keywords: Vec<String>,
    suggestions: Vec<String>,
    strengths: Vec<String>,
    gaps: Vec<String>,
    recommendations: Value,
}

fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn clamp_score(score: f64) -> u32 {
    if score.is_finite() {
        score.round().clamp(0.0, 100.0) as u32
    } else {
        0
    }
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Applies the result contract to any backend's output.
pub fn finalize(mut result: JobMatchResult) -> JobMatchResult {
    result.match_score = result.match_score.min(100);
    result.missing_keywords = dedup_terms(&clean(result.missing_keywords));
    result.strengths = clean(result.strengths);
    result.gaps = clean(result.gaps);
    result.suggestions = if result.match_score > SUGGESTION_THRESHOLD {
        clean(result.suggestions)
    } else {
        Vec::new()
    };
    result.recommendations = result.recommendations.trim().to_string();
    result
}

impl From<RawJobMatch> for JobMatchResult {
    fn from(raw: RawJobMatch) -> Self {
        let recommendations = match raw.recommendations {
            Value::String(s) => s,
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" "),
            _ => String::new(),
        };
        JobMatchResult {
            match_score: clamp_score(raw.match_score),
            missing_keywords: raw.missing_keywords,
            suggestions: raw.suggestions,
            strengths: raw.strengths,
            gaps: raw.gaps,
            recommendations,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmJobMatcher
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmJobMatcher {
    generator: Arc<dyn StructuredResponseGenerator>,
}

impl LlmJobMatcher {
    pub fn new(generator: Arc<dyn StructuredResponseGenerator>) -> Self {
        Self { generator }
    }

    async fn generate(&self, request: &JobMatchRequest) -> Result<JobMatchResult, LlmError> {
        let prompt = job_match_prompt(
            &request.job_description,
            request.resume.label(),
            &request.resume.render(),
            request.job_role.as_deref(),
            &request.job_keywords,
        );
        let raw = self
            .generator
            .generate_structured(&job_match_system(), &prompt)
            .await?
            .ok_or(LlmError::EmptyContent)?;
        let parsed: RawJobMatch = parse_structured(&raw)?;
        Ok(parsed.into())
    }
}

#[async_trait]
impl JobMatcher for LlmJobMatcher {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn evaluate(&self, request: &JobMatchRequest) -> JobMatchResult {
        match self.generate(request).await {
            Ok(result) => {
                let result = finalize(result);
                debug!(
                    "LLM job match: score={}, missing={}",
                    result.match_score,
                    result.missing_keywords.len()
                );
                result
            }
            Err(e) => {
                warn!("LLM job match failed, returning zero result: {}", e);
                JobMatchResult::zero()
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordJobMatcher
// ────────────────────────────────────────────────────────────────────────────

/// Pure-Rust keyword coverage matcher. Deterministic, no model call.
///
/// Algorithm:
/// 1. Job keywords = caller-supplied keywords, then lexicon skills found in the JD
///    (case-insensitive de-duplicated).
/// 2. A keyword is covered when the résumé context contains it as a whole word.
/// 3. match_score = covered / total × 100, rounded.
pub struct KeywordJobMatcher;

impl KeywordJobMatcher {
    pub fn job_keywords(request: &JobMatchRequest) -> Vec<String> {
        let mut terms = request.job_keywords.clone();
        terms.extend(find_known_skills(&request.job_description));
        dedup_terms(&terms)
    }
}

#[async_trait]
impl JobMatcher for KeywordJobMatcher {
    fn backend(&self) -> &'static str {
        "keyword"
    }

    async fn evaluate(&self, request: &JobMatchRequest) -> JobMatchResult {
        finalize(compute_keyword_match(request))
    }
}

fn compute_keyword_match(request: &JobMatchRequest) -> JobMatchResult {
    let keywords = KeywordJobMatcher::job_keywords(request);
    if keywords.is_empty() {
        return JobMatchResult {
            recommendations: "No recognisable keywords in the job description; cannot score the match."
                .to_string(),
            ..JobMatchResult::zero()
        };
    }

    let (strengths, missing): (Vec<String>, Vec<String>) = keywords
        .iter()
        .cloned()
        .partition(|keyword| request.resume.covers(keyword));

    let match_score = clamp_score(strengths.len() as f64 / keywords.len() as f64 * 100.0);
    let gaps = missing
        .iter()
        .map(|k| format!("No evidence of {k} in the résumé"))
        .collect();
    let suggestions = missing
        .iter()
        .map(|k| format!("Add concrete experience with {k} if you have it"))
        .collect();
    let recommendations = build_recommendation(match_score, &missing);

    JobMatchResult {
        match_score,
        missing_keywords: missing,
        suggestions,
        strengths,
        gaps,
        recommendations,
    }
}

fn build_recommendation(score: u32, missing: &[String]) -> String {
    let top_missing: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();

    if score >= 80 {
        "Strong match. Your résumé covers the key job requirements.".to_string()
    } else if score > SUGGESTION_THRESHOLD {
        format!(
            "Moderate match ({score}/100). Consider highlighting: {}.",
            top_missing.join(", ")
        )
    } else {
        format!(
            "Low match ({score}/100). Significant gaps: {}.",
            top_missing.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
