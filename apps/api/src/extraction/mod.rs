//! Field Extraction: turns résumé text into a `Content` profile.
//!
//! Two interchangeable strategies sit behind `ExtractionStrategy`:
//! - `PatternExtractor`: deterministic label/shape rules, no I/O.
//! - `GenerativeExtractor`: one prompt to the Structured-Response Generator.
//!
//! The strategy is picked once at startup from `EXTRACTION_STRATEGY`. Whichever is
//! configured is authoritative; results are never reconciled between the two.

pub mod generative;
pub mod patterns;
pub mod prompts;

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, bail};
use async_trait::async_trait;

use crate::llm_client::StructuredResponseGenerator;
use crate::models::profile::{Content, SkillsSection};

pub use self::generative::GenerativeExtractor;
pub use self::patterns::PatternExtractor;

/// Output of one extraction run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub content: Content,
    /// Skills already split into technical/soft by the model, when available.
    pub skills_hint: Option<SkillsSection>,
}

/// Carried in the orchestrator as `Arc<dyn ExtractionStrategy>`.
///
/// Implementations must not fail: anything they cannot determine is reported
/// through the sentinel values of `Content`.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Short label for logs ("pattern" | "generative").
    fn name(&self) -> &'static str;

    async fn extract(&self, raw_text: &str) -> Extraction;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StrategyKind {
    #[default]
    Pattern,
    Generative,
}

impl FromStr for StrategyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pattern" | "regex" => Ok(StrategyKind::Pattern),
            "generative" | "llm" => Ok(StrategyKind::Generative),
            other => Err(anyhow!(
                "unknown extraction strategy '{other}' (expected 'pattern' or 'generative')"
            )),
        }
    }
}

/// Builds the configured strategy. The generative strategy needs a generator.
pub fn build_strategy(
    kind: StrategyKind,
    generator: Option<Arc<dyn StructuredResponseGenerator>>,
) -> anyhow::Result<Arc<dyn ExtractionStrategy>> {
    match (kind, generator) {
        (StrategyKind::Pattern, _) => Ok(Arc::new(PatternExtractor::new())),
        (StrategyKind::Generative, Some(generator)) => {
            Ok(Arc::new(GenerativeExtractor::new(generator)))
        }
        (StrategyKind::Generative, None) => {
            bail!("EXTRACTION_STRATEGY=generative requires ANTHROPIC_API_KEY")
        }
    }
}
