// Job-match evaluation: trait-based matchers, their prompts, the audit trail
// and the HTTP handler.

pub mod audit;
pub mod handlers;
pub mod job_match;
pub mod prompts;

use std::sync::Arc;

use crate::llm_client::StructuredResponseGenerator;

use self::job_match::{JobMatcher, KeywordJobMatcher, LlmJobMatcher};

/// Picks the matcher backend. The LLM matcher needs both the flag and a generator.
pub fn build_job_matcher(
    enable_llm: bool,
    generator: Option<Arc<dyn StructuredResponseGenerator>>,
) -> Arc<dyn JobMatcher> {
    match generator {
        Some(generator) if enable_llm => Arc::new(LlmJobMatcher::new(generator)),
        _ => Arc::new(KeywordJobMatcher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGenerator;

    #[test]
    fn test_backend_selection() {
        let generator: Arc<dyn StructuredResponseGenerator> = Arc::new(FakeGenerator::failing());
        assert_eq!(build_job_matcher(true, Some(generator.clone())).backend(), "llm");
        assert_eq!(build_job_matcher(false, Some(generator)).backend(), "keyword");
        assert_eq!(build_job_matcher(true, None).backend(), "keyword");
    }
}
