use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::documents::orchestrator::ParsingOrchestrator;
use crate::documents::store::DocumentStore;
use crate::evaluation::job_match::JobMatcher;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub documents: Arc<dyn DocumentStore>,
    pub orchestrator: Arc<ParsingOrchestrator>,
    /// Pluggable job matcher. LlmJobMatcher when a key is configured and
    /// ENABLE_LLM_JOB_MATCH is on, KeywordJobMatcher otherwise.
    pub job_matcher: Arc<dyn JobMatcher>,
    pub rate_limiter: RateLimiter,
    pub config: Config,
}
