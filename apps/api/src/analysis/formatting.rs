//! ATS formatting heuristics. Intentionally coarse: each flag is an independent
//! boolean and no pass/fail score is derived here.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::lexical::{line_count, line_lengths, lines, word_count};
use crate::models::profile::DocumentFormatting;

/// Inclusive word-count window for a one-to-two page résumé.
pub const OPTIMAL_WORDS: (usize, usize) = (300, 700);
/// Inclusive lines-per-word window.
pub const SPACING_RATIO: (f64, f64) = (0.05, 0.10);
/// Spread between the longest and shortest line, in characters.
pub const MARGIN_SPREAD_THRESHOLD: usize = 20;
/// Emphasis markers at or above this count suggest garbled inline styling.
pub const EMPHASIS_MARKER_LIMIT: usize = 3;
const MAX_HEADER_LENGTH: usize = 40;

static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z\s&/]{2,}").expect("valid header regex"));
static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•▪◦●‣*\-–]\s+").expect("valid bullet regex"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*[^*\n]+\*\*|__[^_\n]+__|\*[^*\s][^*\n]*\*|\b_[^_\s][^_\n]*_\b")
        .expect("valid emphasis regex")
});

pub fn analyze_formatting(text: &str) -> DocumentFormatting {
    let words = word_count(text);

    let has_optimal_length = (OPTIMAL_WORDS.0..=OPTIMAL_WORDS.1).contains(&words);
    let has_appropriate_spacing = spacing_ok(line_count(text), words);
    let margin_alignment = margins_aligned(&line_lengths(text));
    let section_headers = lines(text).any(is_section_header);
    let bullet_points = lines(text).any(|line| BULLET.is_match(line));
    let font_consistency = emphasis_marker_count(text) < EMPHASIS_MARKER_LIMIT;

    DocumentFormatting {
        is_properly_formatted: section_headers && bullet_points && font_consistency,
        has_optimal_length,
        has_appropriate_spacing,
        font_consistency,
        margin_alignment,
        section_headers,
        bullet_points,
    }
}

fn spacing_ok(lines: usize, words: usize) -> bool {
    if words == 0 {
        return false;
    }
    let ratio = lines as f64 / words as f64;
    ratio >= SPACING_RATIO.0 && ratio <= SPACING_RATIO.1
}

fn margins_aligned(lengths: &[usize]) -> bool {
    match (lengths.iter().max(), lengths.iter().min()) {
        (Some(max), Some(min)) => max - min < MARGIN_SPREAD_THRESHOLD,
        _ => true,
    }
}

fn is_section_header(line: &str) -> bool {
    line.chars().count() <= MAX_HEADER_LENGTH && SECTION_HEADER.is_match(line)
}

pub fn emphasis_marker_count(text: &str) -> usize {
    EMPHASIS.find_iter(text).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(words: usize) -> String {
        vec!["delivery"; words].join(" ")
    }

    #[test]
    fn test_empty_text_returns_all_flags() {
        let f = analyze_formatting("");
        assert!(!f.has_optimal_length);
        assert!(!f.has_appropriate_spacing);
        assert!(!f.section_headers);
        assert!(!f.bullet_points);
        assert!(f.font_consistency);
        assert!(f.margin_alignment);
        assert!(!f.is_properly_formatted);
    }

    #[test]
    fn test_optimal_length_window_is_inclusive() {
        assert!(!analyze_formatting(&filler(299)).has_optimal_length);
        assert!(analyze_formatting(&filler(300)).has_optimal_length);
        assert!(analyze_formatting(&filler(700)).has_optimal_length);
        assert!(!analyze_formatting(&filler(701)).has_optimal_length);
    }

    #[test]
    fn test_spacing_ratio() {
        // 100 words over 9 lines → 0.09
        let text = (0..8)
            .map(|_| vec!["word"; 12].join(" "))
            .chain(std::iter::once(vec!["word"; 4].join(" ")))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(word_count(&text), 100);
        assert!(analyze_formatting(&text).has_appropriate_spacing);

        // one word per line → ratio 1.0
        assert!(!analyze_formatting("a\nb\nc\nd").has_appropriate_spacing);
    }

    #[test]
    fn test_margin_alignment_flags_irregular_lines() {
        let even = "Senior engineer at Acme\nBuilt the billing platform\nLed a team of five people";
        assert!(analyze_formatting(even).margin_alignment);

        let ragged = "Skills\nRust, Go, Python, PostgreSQL, Kubernetes, Terraform and AWS";
        assert!(!analyze_formatting(ragged).margin_alignment);
    }

    #[test]
    fn test_section_headers_detected() {
        assert!(analyze_formatting("EXPERIENCE\nDid things").section_headers);
        assert!(analyze_formatting("WORK HISTORY & PROJECTS").section_headers);
        assert!(!analyze_formatting("Experience\nDid things").section_headers);
        let long = "THIS LINE IS ALL CAPS BUT FAR TOO LONG TO BE A SECTION HEADER";
        assert!(!analyze_formatting(long).section_headers);
    }

    #[test]
    fn test_bullet_points_detected() {
        assert!(analyze_formatting("• Shipped v2").bullet_points);
        assert!(analyze_formatting("  - Shipped v2").bullet_points);
        assert!(analyze_formatting("* Shipped v2").bullet_points);
        assert!(!analyze_formatting("-Shipped v2").bullet_points);
        assert!(!analyze_formatting("Shipped - v2").bullet_points);
    }

    #[test]
    fn test_font_consistency_counts_emphasis_markers() {
        assert!(analyze_formatting("**Bold** and *italic*").font_consistency);
        assert!(!analyze_formatting("**One** **two** __three__").font_consistency);
        assert_eq!(emphasis_marker_count("**a** _b_ *c* __d__"), 4);
        assert_eq!(emphasis_marker_count("snake_case_name and 2 * 3 * 4"), 0);
    }

    #[test]
    fn test_properly_formatted_requires_headers_bullets_and_clean_styling() {
        let good = "EXPERIENCE\n• Built the ingestion pipeline\n• Cut costs by 30%";
        assert!(analyze_formatting(good).is_properly_formatted);

        let no_bullets = "EXPERIENCE\nBuilt the ingestion pipeline";
        assert!(!analyze_formatting(no_bullets).is_properly_formatted);
    }
}
