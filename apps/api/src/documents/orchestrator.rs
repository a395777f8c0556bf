//! Parsing Orchestrator: drives one document through fetch → extract → analyze.
//!
//! The pipeline body runs in its own task, supervised by a second detached task
//! that records any failure. Neither depends on the caller staying around: an
//! error, a panic or a dropped caller still leaves the document `PARSED` or
//! `ERROR`, never parked in `STARTED`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::{analyze_document, AnalysisInput};
use crate::documents::fetcher::DocumentFetcher;
use crate::documents::lifecycle::{Document, ParsingStatus};
use crate::documents::store::{ClaimOutcome, DocumentStore};
use crate::errors::AppError;
use crate::extraction::ExtractionStrategy;

/// Per-invocation options.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Job-description keywords; adds relevance scores to the keyword table.
    pub job_keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessOutcome {
    /// Claimed and handed to a background task.
    Submitted,
    /// Claimed and run to completion.
    Parsed,
    AlreadyInProgress,
    AlreadyParsed,
    /// Ran to completion, but the document left `STARTED` before the results
    /// were written, so they were discarded.
    Superseded,
}

impl ProcessOutcome {
    /// Status the document is known to hold after this outcome, if any.
    pub fn known_status(&self) -> Option<ParsingStatus> {
        match self {
            ProcessOutcome::Parsed | ProcessOutcome::AlreadyParsed => Some(ParsingStatus::Parsed),
            ProcessOutcome::Submitted | ProcessOutcome::AlreadyInProgress => {
                Some(ParsingStatus::Started)
            }
            ProcessOutcome::Superseded => None,
        }
    }
}

pub struct ParsingOrchestrator {
    store: Arc<dyn DocumentStore>,
    fetcher: Arc<dyn DocumentFetcher>,
    extractor: Arc<dyn ExtractionStrategy>,
    fetch_timeout: Duration,
}

impl ParsingOrchestrator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        fetcher: Arc<dyn DocumentFetcher>,
        extractor: Arc<dyn ExtractionStrategy>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            store,
            fetcher,
            extractor,
            fetch_timeout,
        }
    }

    /// Claims the document and runs the whole pipeline before returning.
    /// Fetch and empty-content failures are returned after `ERROR` is persisted.
    pub async fn process_document(
        self: &Arc<Self>,
        id: Uuid,
        options: ProcessOptions,
    ) -> Result<ProcessOutcome, AppError> {
        let document = match self.claim(id).await? {
            Ok(document) => document,
            Err(outcome) => return Ok(outcome),
        };
        match self.spawn_guarded(document, options).await {
            Ok(result) => result,
            Err(join_error) => Err(AppError::Internal(anyhow!(
                "parsing supervisor aborted: {join_error}"
            ))),
        }
    }

    /// Claims the document synchronously, then runs the pipeline in the background.
    /// The caller polls the document status for the result.
    pub async fn submit(
        self: &Arc<Self>,
        id: Uuid,
        options: ProcessOptions,
    ) -> Result<ProcessOutcome, AppError> {
        let document = match self.claim(id).await? {
            Ok(document) => document,
            Err(outcome) => return Ok(outcome),
        };

        // Detached; failures are persisted as ERROR and logged by the supervisor.
        drop(self.spawn_guarded(document, options));
        Ok(ProcessOutcome::Submitted)
    }

    /// `Ok(document)` when this caller owns the run, `Err(outcome)` for a no-op.
    async fn claim(&self, id: Uuid) -> Result<Result<Document, ProcessOutcome>, AppError> {
        match self.store.claim(id).await? {
            ClaimOutcome::Claimed(document) => {
                info!(
                    "Document {id} claimed for parsing ({} strategy)",
                    self.extractor.name()
                );
                Ok(Ok(document))
            }
            ClaimOutcome::AlreadyInProgress => {
                info!("Document {id} is already being processed");
                Ok(Err(ProcessOutcome::AlreadyInProgress))
            }
            ClaimOutcome::AlreadyParsed => Ok(Err(ProcessOutcome::AlreadyParsed)),
            ClaimOutcome::NotFound => Err(AppError::NotFound(format!("Document {id} not found"))),
        }
    }

    /// Spawns the supervisor task. It runs the pipeline in a nested task and
    /// forces `ERROR` on any failure, including a panic inside extraction or
    /// analysis. Dropping the returned handle does not cancel either task.
    fn spawn_guarded(
        self: &Arc<Self>,
        document: Document,
        options: ProcessOptions,
    ) -> JoinHandle<Result<ProcessOutcome, AppError>> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let id = document.id;
            let pipeline = Arc::clone(&this);
            let outcome =
                tokio::spawn(async move { pipeline.run_pipeline(document, options).await }).await;

            let failure = match outcome {
                Ok(Ok(true)) => {
                    info!("Document {id} parsed");
                    return Ok(ProcessOutcome::Parsed);
                }
                Ok(Ok(false)) => return Ok(ProcessOutcome::Superseded),
                Ok(Err(e)) => e,
                Err(join_error) => {
                    AppError::Internal(anyhow!("parsing task aborted: {join_error}"))
                }
            };

            error!("Parsing document {id} failed: {failure}");
            if let Err(e) = this.store.mark_error(id, &failure.to_string()).await {
                error!("Could not mark document {id} as ERROR: {e}");
            }
            Err(failure)
        })
    }

    /// `Ok(false)` when the results were discarded because the document had
    /// already left `STARTED`.
    async fn run_pipeline(
        &self,
        document: Document,
        options: ProcessOptions,
    ) -> Result<bool, AppError> {
        let text = match tokio::time::timeout(
            self.fetch_timeout,
            self.fetcher.fetch_text(document.locator()),
        )
        .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(AppError::UpstreamFetch(e.to_string())),
            Err(_) => {
                return Err(AppError::UpstreamFetch(format!(
                    "timed out after {}s",
                    self.fetch_timeout.as_secs_f32()
                )))
            }
        };

        if text.trim().is_empty() {
            warn!("Document {} yielded no text", document.id);
            return Err(AppError::EmptyContent(format!(
                "{} contains no extractable text",
                document.file_name
            )));
        }

        let extraction = self.extractor.extract(&text).await;
        let analysis = analyze_document(AnalysisInput {
            text: &text,
            content: &extraction.content,
            skills_hint: extraction.skills_hint.as_ref(),
            file_type: &document.file_type,
            file_size: document.file_size,
            job_keywords: options.job_keywords.as_deref(),
        });

        self.store
            .mark_parsed(document.id, &extraction.content, &analysis)
            .await
    }
}
