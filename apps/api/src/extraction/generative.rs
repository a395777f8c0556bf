//! Generative strategy: one structured prompt per résumé.
//!
//! Generator errors and unusable output are recovered here. The caller always
//! receives a well-formed `Extraction`, at worst the all-sentinel default.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::extraction::prompts::{extraction_prompt, extraction_system};
use crate::extraction::{Extraction, ExtractionStrategy};
use crate::llm_client::{parse_structured, LlmError, StructuredResponseGenerator};
use crate::models::profile::{Content, SkillsSection};

/// Shape the model is asked to return. Only the content and the skills
/// categorisation are taken from it; every other analysis figure is computed locally.
/// The analysis block stays untyped: a bad value there must not discard the content.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeneratedProfile {
    content: Option<Content>,
    analysis: Value,
}

impl GeneratedProfile {
    fn skills_section(&self) -> SkillsSection {
        self.analysis
            .pointer("/contentQuality/skillsSection")
            .and_then(|section| SkillsSection::deserialize(section).ok())
            .unwrap_or_default()
    }
}

pub struct GenerativeExtractor {
    generator: Arc<dyn StructuredResponseGenerator>,
}

impl GenerativeExtractor {
    pub fn new(generator: Arc<dyn StructuredResponseGenerator>) -> Self {
        Self { generator }
    }

    async fn generate(&self, raw_text: &str) -> Result<GeneratedProfile, LlmError> {
        let raw = self
            .generator
            .generate_structured(&extraction_system(), &extraction_prompt(raw_text))
            .await?
            .ok_or(LlmError::EmptyContent)?;
        parse_structured(&raw)
    }
}

#[async_trait]
impl ExtractionStrategy for GenerativeExtractor {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn extract(&self, raw_text: &str) -> Extraction {
        match self.generate(raw_text).await {
            Ok(profile) => {
                let skills = profile.skills_section();
                let content = profile.content.unwrap_or_default();
                debug!(
                    "Generative extraction produced {} skills ({} technical, {} soft)",
                    content.skills.len(),
                    skills.technical_skills.len(),
                    skills.soft_skills.len()
                );
                Extraction {
                    content: content.normalized(),
                    skills_hint: (!skills.is_empty()).then_some(skills),
                }
            }
            Err(e) => {
                warn!("Generative extraction failed, using default profile: {}", e);
                Extraction::default()
            }
        }
    }
}
