//! Candidate profile (`Content`) and ATS analysis (`Analysis`) shapes.
//!
//! These types are the stable JSON contract shared by both extraction strategies,
//! the persisted `documents.content` / `documents.analysis` columns and the HTTP API.
//! Keys serialize in camelCase.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Sentinel for scalar profile fields that could not be located.
pub const NOT_FOUND: &str = "Not found";
/// Sentinel for a missing candidate name.
pub const UNKNOWN_NAME: &str = "Unknown";

// ────────────────────────────────────────────────────────────────────────────
// Content
// ────────────────────────────────────────────────────────────────────────────

/// Structured candidate profile extracted from résumé text.
///
/// Every field is best-effort. Missing scalars hold a sentinel, missing
/// collections are empty. `skills` keeps source order and duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Content {
    #[serde(deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(deserialize_with = "nullable_string")]
    pub phone: String,
    #[serde(deserialize_with = "nullable_string")]
    pub address: String,
    #[serde(deserialize_with = "nullable_string")]
    pub linked_in: String,
    #[serde(deserialize_with = "nullable_string")]
    pub github_profile: String,
    #[serde(deserialize_with = "nullable_string")]
    pub portfolio_url: String,
    #[serde(deserialize_with = "nullable_string")]
    pub education: String,
    #[serde(deserialize_with = "nullable_string")]
    pub experience: String,
    #[serde(deserialize_with = "nullable_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub certifications: Vec<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub projects: Vec<String>,
    #[serde(deserialize_with = "nullable_string")]
    pub summary: String,
    #[serde(deserialize_with = "lenient_number")]
    pub years_of_experience: Option<f64>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            email: NOT_FOUND.to_string(),
            phone: NOT_FOUND.to_string(),
            address: NOT_FOUND.to_string(),
            linked_in: NOT_FOUND.to_string(),
            github_profile: NOT_FOUND.to_string(),
            portfolio_url: NOT_FOUND.to_string(),
            education: NOT_FOUND.to_string(),
            experience: NOT_FOUND.to_string(),
            skills: Vec::new(),
            certifications: Vec::new(),
            languages: Vec::new(),
            projects: Vec::new(),
            summary: NOT_FOUND.to_string(),
            years_of_experience: None,
        }
    }
}

impl Content {
    /// Replaces blank scalars with their sentinel, trims list items and drops empty ones.
    /// Applied to the output of every extraction strategy.
    pub fn normalized(mut self) -> Self {
        fill_blank(&mut self.name, UNKNOWN_NAME);
        for field in [
            &mut self.email,
            &mut self.phone,
            &mut self.address,
            &mut self.linked_in,
            &mut self.github_profile,
            &mut self.portfolio_url,
            &mut self.education,
            &mut self.experience,
            &mut self.summary,
        ] {
            fill_blank(field, NOT_FOUND);
        }
        for list in [
            &mut self.skills,
            &mut self.certifications,
            &mut self.languages,
            &mut self.projects,
        ] {
            clean_list(list);
        }
        self.years_of_experience = self
            .years_of_experience
            .filter(|years| years.is_finite() && *years >= 0.0);
        self
    }

    pub fn has_summary(&self) -> bool {
        is_found(&self.summary)
    }
}

/// True when a scalar field holds a real value rather than a sentinel.
pub fn is_found(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != NOT_FOUND && value != UNKNOWN_NAME
}

fn fill_blank(field: &mut String, sentinel: &str) {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        *field = sentinel.to_string();
    } else if trimmed.len() != field.len() {
        *field = trimmed.to_string();
    }
}

fn clean_list(list: &mut Vec<String>) {
    *list = list
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect();
}

// ────────────────────────────────────────────────────────────────────────────
// Analysis
// ────────────────────────────────────────────────────────────────────────────

/// Composite ATS analysis of a résumé.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Analysis {
    pub content_quality: ContentQuality,
    pub keyword_analysis: Vec<KeywordInsight>,
    pub document_formatting: DocumentFormatting,
    /// Flesch–Kincaid grade level, one decimal.
    pub readability_score: f64,
    pub file_type: String,
    pub file_size: i64,
    pub text_statistics: TextStatistics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentQuality {
    pub has_professional_summary: bool,
    pub contact_info_present: ContactInfoPresence,
    pub skills_section: SkillsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfoPresence {
    pub email: bool,
    pub phone: bool,
    pub address: bool,
    pub linked_in: bool,
    pub github: bool,
    pub portfolio: bool,
}

impl ContactInfoPresence {
    pub fn from_content(content: &Content) -> Self {
        Self {
            email: is_found(&content.email),
            phone: is_found(&content.phone),
            address: is_found(&content.address),
            linked_in: is_found(&content.linked_in),
            github: is_found(&content.github_profile),
            portfolio: is_found(&content.portfolio_url),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillsSection {
    #[serde(deserialize_with = "nullable_list")]
    pub technical_skills: Vec<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub soft_skills: Vec<String>,
    #[serde(deserialize_with = "nullable_list")]
    pub certifications: Vec<String>,
}

impl SkillsSection {
    pub fn is_empty(&self) -> bool {
        self.technical_skills.is_empty() && self.soft_skills.is_empty()
    }
}

/// One row of the keyword table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeywordInsight {
    pub term: String,
    pub occurrences: usize,
    pub frequency_percentage: f64,
    /// Only present when job-description keywords were supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    /// Text surrounding the first occurrence, empty when the term is absent.
    pub context: String,
}

/// Independent formatting heuristics. Callers combine them as needed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentFormatting {
    pub is_properly_formatted: bool,
    pub has_optimal_length: bool,
    pub has_appropriate_spacing: bool,
    pub font_consistency: bool,
    pub margin_alignment: bool,
    pub section_headers: bool,
    pub bullet_points: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStatistics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub line_count: usize,
    pub average_words_per_sentence: f64,
    pub average_words_per_line: f64,
    pub max_line_length: usize,
    pub min_line_length: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient deserializers for model-produced JSON
// ────────────────────────────────────────────────────────────────────────────

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // Models occasionally return sections as arrays of lines.
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => String::new(),
    })
}

fn nullable_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').map(|s| s.trim().to_string()).collect(),
        _ => Vec::new(),
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('+').parse().ok(),
        _ => None,
    })
}
