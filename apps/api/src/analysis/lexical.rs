//! Lexical Metrics: word/sentence/syllable counts, Flesch–Kincaid grade level
//! and line statistics. Pure and total over any input, including the empty string.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::profile::TextStatistics;

static SILENT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").expect("valid suffix regex"));
static LEADING_Y: Lazy<Regex> = Lazy::new(|| Regex::new(r"^y").expect("valid leading-y regex"));
static VOWEL_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[aeiouy]+").expect("valid vowel regex"));
static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

/// Estimates the syllables in a single word. Always returns at least 1.
pub fn count_syllables(word: &str) -> usize {
    let word = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    if word.chars().count() <= 3 {
        return 1;
    }
    let stripped = SILENT_SUFFIX.replace(&word, "");
    let stripped = LEADING_Y.replace(&stripped, "");
    VOWEL_GROUP.find_iter(&stripped).count().max(1)
}

/// Whitespace-delimited tokens.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

pub fn word_count(text: &str) -> usize {
    words(text).count()
}

/// Segments between runs of `.`, `!`, `?` that contain any non-whitespace.
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_BOUNDARY
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

/// Non-empty lines, trimmed.
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

pub fn line_count(text: &str) -> usize {
    lines(text).count()
}

/// Character lengths of the non-empty lines.
pub fn line_lengths(text: &str) -> Vec<usize> {
    lines(text).map(|line| line.chars().count()).collect()
}

/// Flesch–Kincaid grade level rounded to one decimal:
/// `0.39 * (words / sentences) + 11.8 * (syllables / words) - 15.59`.
/// Returns `0.0` when there are no words or no sentences.
pub fn compute_readability(text: &str) -> f64 {
    let word_total = word_count(text);
    let sentence_total = sentence_count(text);
    if word_total == 0 || sentence_total == 0 {
        return 0.0;
    }
    let syllables: usize = words(text).map(count_syllables).sum();

    let words_per_sentence = word_total as f64 / sentence_total as f64;
    let syllables_per_word = syllables as f64 / word_total as f64;
    let grade = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;
    round_one_decimal(grade)
}

pub fn text_statistics(text: &str) -> TextStatistics {
    let word_count = word_count(text);
    let sentence_count = sentence_count(text);
    let lengths = line_lengths(text);
    let line_count = lengths.len();

    TextStatistics {
        word_count,
        sentence_count,
        line_count,
        average_words_per_sentence: ratio(word_count, sentence_count),
        average_words_per_line: ratio(word_count, line_count),
        max_line_length: lengths.iter().copied().max().unwrap_or(0),
        min_line_length: lengths.iter().copied().min().unwrap_or(0),
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        round_one_decimal(numerator as f64 / denominator as f64)
    }
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str =
        "The cat sat on the garden and ate a red apple. The dog ran to his den and lay low.";

    #[test]
    fn test_short_words_are_one_syllable() {
        for word in ["a", "the", "cat", "sky", "I"] {
            assert_eq!(count_syllables(word), 1, "{word}");
        }
    }

    #[test]
    fn test_syllables_for_common_words() {
        assert_eq!(count_syllables("garden"), 2);
        assert_eq!(count_syllables("apple."), 2);
        assert_eq!(count_syllables("engineering"), 4);
        assert_eq!(count_syllables("Python"), 2);
    }

    #[test]
    fn test_syllable_count_is_never_zero() {
        for word in ["rhythm", "---", "", "bcdfg", "shhh", "yes", "crwth"] {
            assert!(count_syllables(word) >= 1, "{word}");
        }
    }

    #[test]
    fn test_readability_of_empty_text_is_zero() {
        assert_eq!(compute_readability(""), 0.0);
        assert_eq!(compute_readability("   \n\t "), 0.0);
        assert_eq!(compute_readability("?!..."), 0.0);
    }

    #[test]
    fn test_readability_matches_hand_computed_grade() {
        // 20 words, 2 sentences, 22 syllables (garden=2, apple=2, rest 1)
        assert_eq!(word_count(SAMPLE), 20);
        assert_eq!(sentence_count(SAMPLE), 2);
        let syllables: usize = words(SAMPLE).map(count_syllables).sum();
        assert_eq!(syllables, 22);

        let expected = 0.39 * (20.0 / 2.0) + 11.8 * (22.0 / 20.0) - 15.59;
        let score = compute_readability(SAMPLE);
        assert!((score - expected).abs() <= 0.1, "score {score}, expected {expected}");
        assert_eq!(score, 1.3);
    }

    #[test]
    fn test_readability_is_finite_for_odd_inputs() {
        for text in [
            "word",
            "...",
            "Supercalifragilisticexpialidocious",
            "• Led team\n• Built API",
            "!!!hello???",
        ] {
            assert!(compute_readability(text).is_finite(), "{text}");
        }
    }

    #[test]
    fn test_sentence_count_splits_on_punctuation_runs() {
        assert_eq!(sentence_count("One. Two!! Three?! Four"), 4);
        assert_eq!(sentence_count("No terminal punctuation"), 1);
        assert_eq!(sentence_count(""), 0);
    }

    #[test]
    fn test_line_count_ignores_blank_lines() {
        assert_eq!(line_count("a\n\n  \nb\nc"), 3);
        assert_eq!(line_count(""), 0);
    }

    #[test]
    fn test_text_statistics() {
        let stats = text_statistics("JOHN DOE\nSoftware engineer.\n\nBuilt things. Shipped them.");
        assert_eq!(stats.word_count, 8);
        assert_eq!(stats.line_count, 3);
        assert_eq!(stats.max_line_length, 27);
        assert_eq!(stats.min_line_length, 8);
        assert!(stats.average_words_per_line > 2.0);
    }

    #[test]
    fn test_text_statistics_empty() {
        let stats = text_statistics("");
        assert_eq!(stats, TextStatistics::default());
    }
}
