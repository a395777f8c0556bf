//! Keyword Density: case-insensitive whole-word occurrence counts and
//! density percentages for a caller-supplied keyword list.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::lexical::word_count;
use crate::models::profile::KeywordInsight;

/// Fallback term list when a résumé has no extracted skills.
pub const DEFAULT_ATS_KEYWORDS: &[&str] = &[
    "leadership",
    "communication",
    "project management",
    "teamwork",
    "problem solving",
    "agile",
    "data analysis",
    "customer service",
    "python",
    "sql",
    "javascript",
    "aws",
];

/// Characters of surrounding text captured on each side of a keyword hit.
const CONTEXT_RADIUS: usize = 40;
/// Relevance ceiling for terms the job description does not mention.
const UNLISTED_RELEVANCE_CAP: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDensity {
    pub keyword: String,
    pub count: usize,
    /// count / total words × 100, rounded to two decimals.
    pub density: f64,
}

/// Computes density rows in the same order as `keywords`.
/// An empty document yields a density of 0 for every keyword.
pub fn compute_density<S: AsRef<str>>(text: &str, keywords: &[S]) -> Vec<KeywordDensity> {
    let total_words = word_count(text);
    keywords
        .iter()
        .map(|keyword| {
            let keyword = keyword.as_ref();
            let count = count_occurrences(text, keyword);
            KeywordDensity {
                keyword: keyword.to_string(),
                count,
                density: density(count, total_words),
            }
        })
        .collect()
}

/// Builds the analysis keyword table. With `job_keywords`, each row also carries
/// a relevance score: 100 for terms the job asks for, otherwise scaled by
/// occurrences and capped at 50.
pub fn keyword_analysis<S: AsRef<str>>(
    text: &str,
    terms: &[S],
    job_keywords: Option<&[String]>,
) -> Vec<KeywordInsight> {
    compute_density(text, terms)
        .into_iter()
        .map(|row| {
            let relevance_score = job_keywords.map(|wanted| {
                if wanted.iter().any(|w| w.trim().eq_ignore_ascii_case(&row.keyword)) {
                    100.0
                } else {
                    (row.count as f64 * 10.0).min(UNLISTED_RELEVANCE_CAP)
                }
            });
            let context = occurrence_spans(text, &row.keyword)
                .first()
                .map(|&(start, end)| snippet(text, start, end))
                .unwrap_or_default();
            KeywordInsight {
                term: row.keyword,
                occurrences: row.count,
                frequency_percentage: row.density,
                relevance_score,
                context,
            }
        })
        .collect()
}

/// Number of case-insensitive whole-word occurrences of `keyword` in `text`.
pub fn count_occurrences(text: &str, keyword: &str) -> usize {
    occurrence_spans(text, keyword).len()
}

pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    count_occurrences(text, keyword) > 0
}

/// Byte spans of whole-word matches. Word boundaries are checked against the
/// neighbouring characters so keywords such as `C++` or `.NET` still match.
fn occurrence_spans(text: &str, keyword: &str) -> Vec<(usize, usize)> {
    let keyword = keyword.trim();
    if keyword.is_empty() || text.is_empty() {
        return Vec::new();
    }
    let Ok(pattern) = Regex::new(&format!("(?i){}", regex::escape(keyword))) else {
        return Vec::new();
    };
    pattern
        .find_iter(text)
        .filter(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
        .map(|m| (m.start(), m.end()))
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn density(count: usize, total_words: usize) -> f64 {
    if total_words == 0 {
        return 0.0;
    }
    let pct = count as f64 / total_words as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

fn snippet(text: &str, start: usize, end: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_RADIUS.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_RADIUS)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    text[from..to].split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive de-duplication preserving first-seen order.
pub fn dedup_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    terms
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .map(String::from)
        .collect()
}
