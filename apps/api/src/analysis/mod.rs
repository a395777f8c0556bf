// ATS analysis: lexical metrics, formatting heuristics, keyword density and
// skill categorization, merged into one `Analysis` per document.

pub mod formatting;
pub mod keywords;
pub mod lexical;
pub mod skills;

use crate::models::profile::{Analysis, ContactInfoPresence, Content, ContentQuality, SkillsSection};

use self::keywords::{dedup_terms, keyword_analysis, DEFAULT_ATS_KEYWORDS};

/// Inputs for a single document analysis.
pub struct AnalysisInput<'a> {
    pub text: &'a str,
    pub content: &'a Content,
    /// Model-categorised skills, preferred over the lexicon when non-empty.
    pub skills_hint: Option<&'a SkillsSection>,
    pub file_type: &'a str,
    pub file_size: i64,
    /// Job-description keywords; enables relevance scores in the keyword table.
    pub job_keywords: Option<&'a [String]>,
}

/// Builds the composite analysis. Pure; never fails.
pub fn analyze_document(input: AnalysisInput<'_>) -> Analysis {
    let AnalysisInput {
        text,
        content,
        skills_hint,
        file_type,
        file_size,
        job_keywords,
    } = input;

    let skills_section = match skills_hint {
        Some(hint) if !hint.is_empty() => {
            let mut hint = hint.clone();
            if hint.certifications.is_empty() {
                hint.certifications = dedup_terms(&content.certifications);
            }
            hint
        }
        _ => skills::categorize(&content.skills, &content.certifications),
    };

    let terms = analysis_terms(content);

    Analysis {
        content_quality: ContentQuality {
            has_professional_summary: content.has_summary(),
            contact_info_present: ContactInfoPresence::from_content(content),
            skills_section,
        },
        keyword_analysis: keyword_analysis(text, &terms, job_keywords),
        document_formatting: formatting::analyze_formatting(text),
        readability_score: lexical::compute_readability(text),
        file_type: file_type.to_string(),
        file_size,
        text_statistics: lexical::text_statistics(text),
    }
}

/// Terms for the keyword table: the extracted skills, or the default ATS list
/// when extraction found none.
fn analysis_terms(content: &Content) -> Vec<String> {
    let skills = dedup_terms(&content.skills);
    if skills.is_empty() {
        DEFAULT_ATS_KEYWORDS.iter().map(|s| s.to_string()).collect()
    } else {
        skills
    }
}
