mod analysis;
mod config;
mod db;
mod documents;
mod errors;
mod evaluation;
mod extraction;
mod llm_client;
mod models;
mod rate_limit;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::documents::fetcher::S3DocumentFetcher;
use crate::documents::orchestrator::ParsingOrchestrator;
use crate::documents::store::PgDocumentStore;
use crate::evaluation::build_job_matcher;
use crate::extraction::build_strategy;
use crate::llm_client::{LlmClient, StructuredResponseGenerator};
use crate::rate_limit::RateLimiter;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (migrations included)
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis (rate limiting)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize the structured-response generator, when a key is configured
    let generator: Option<Arc<dyn StructuredResponseGenerator>> =
        match config.anthropic_api_key.clone() {
            Some(key) => {
                let client: Arc<dyn StructuredResponseGenerator> = Arc::new(LlmClient::new(key));
                info!("LLM client initialized (model: {})", llm_client::MODEL);
                Some(client)
            }
            None => {
                warn!("ANTHROPIC_API_KEY not set; generative features disabled");
                None
            }
        };

    let extractor = build_strategy(config.extraction_strategy, generator.clone())?;
    info!("Extraction strategy: {}", extractor.name());

    let job_matcher = build_job_matcher(config.enable_llm_job_match, generator);
    info!("Job matcher backend: {}", job_matcher.backend());

    let documents = Arc::new(PgDocumentStore::new(db.clone()));
    let fetcher = Arc::new(S3DocumentFetcher::new(s3, config.s3_bucket.clone()));
    let orchestrator = Arc::new(ParsingOrchestrator::new(
        documents.clone(),
        fetcher,
        extractor,
        Duration::from_secs(config.fetch_timeout_secs),
    ));

    let rate_limiter = RateLimiter::new(
        redis,
        config.rate_limit_max,
        Duration::from_secs(config.rate_limit_window_secs),
    );

    // Build app state
    let state = AppState {
        db,
        documents,
        orchestrator,
        job_matcher,
        rate_limiter,
        config: config.clone(),
    };

    // Build router
    // TODO: restrict origins once the web client's domain is fixed
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "resume-api-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
