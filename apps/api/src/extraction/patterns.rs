//! Pattern strategy: ordered field-locator rules over raw résumé text.
//!
//! Each field owns an ordered list of locators; the first one that yields a
//! non-empty value wins. Labelled lines (`Email: ...`) are tried before bare
//! shapes (an email address anywhere in the text). Section fields capture every
//! line after their header up to the next recognised header.

use async_trait::async_trait;
use regex::Regex;

use crate::extraction::{Extraction, ExtractionStrategy};
use crate::models::profile::Content;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Email,
    Phone,
    Address,
    LinkedIn,
    Github,
    Portfolio,
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Languages,
    Projects,
    YearsOfExperience,
}

enum Locator {
    /// `Label: value` on one line; capture group 1 is the value.
    Labeled(Regex),
    /// Header line, then the block that runs to the next known header.
    /// Capture group 1 holds any inline text after `Header:`.
    Section(Regex),
    /// Shape anywhere in the text; group 1 when present, else the whole match.
    Bare(Regex),
    /// First short line near the top that reads like a person's name.
    LeadingName,
    /// First URL that is not a LinkedIn or GitHub profile.
    OtherUrl,
}

struct FieldRule {
    field: Field,
    locators: Vec<Locator>,
}

// ────────────────────────────────────────────────────────────────────────────
// Rule table
// ────────────────────────────────────────────────────────────────────────────

const SUMMARY_HEADERS: &[&str] = &[
    "summary",
    "professional summary",
    "career summary",
    "profile",
    "professional profile",
    "objective",
    "career objective",
    "about me",
];
const EXPERIENCE_HEADERS: &[&str] = &[
    "experience",
    "work experience",
    "professional experience",
    "employment history",
    "employment",
    "work history",
];
const EDUCATION_HEADERS: &[&str] = &["education", "academic background", "qualifications"];
const SKILLS_HEADERS: &[&str] = &[
    "skills",
    "technical skills",
    "key skills",
    "core competencies",
    "competencies",
];
const CERTIFICATION_HEADERS: &[&str] = &[
    "certifications",
    "certification",
    "certificates",
    "licenses & certifications",
    "licenses and certifications",
];
const LANGUAGE_HEADERS: &[&str] = &["languages", "language skills"];
const PROJECT_HEADERS: &[&str] = &["projects", "personal projects", "key projects", "side projects"];

const CONTACT_LABELS: &str =
    r"name|full name|e-?mail|phone|mobile|tel|telephone|address|location|linkedin|github|portfolio|website";

/// Lines that sit above the name on some résumés.
const TITLE_LINES: &[&str] = &["resume", "résumé", "curriculum vitae", "cv"];

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid extraction pattern")
}

fn labeled(labels: &str) -> Locator {
    Locator::Labeled(regex(&format!(
        r"(?im)^[ \t]*(?:{labels})[ \t]*[:\-–][ \t]*(.+?)[ \t]*$"
    )))
}

fn section(aliases: &[&str]) -> Locator {
    Locator::Section(section_regex(aliases))
}

fn section_regex(aliases: &[&str]) -> Regex {
    let alternatives = aliases
        .iter()
        .map(|a| regex::escape(a).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    regex(&format!(r"(?i)^\s*(?:{alternatives})\s*(?::\s*(.*))?$"))
}

fn bare(pattern: &str) -> Locator {
    Locator::Bare(regex(pattern))
}

/// Deterministic extractor built from a fixed, ordered rule table.
pub struct PatternExtractor {
    rules: Vec<FieldRule>,
    headers: Vec<Regex>,
    contact_label: Regex,
    url: Regex,
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternExtractor {
    pub fn new() -> Self {
        let rules = vec![
            FieldRule {
                field: Field::Name,
                locators: vec![labeled("name|full name"), Locator::LeadingName],
            },
            FieldRule {
                field: Field::Email,
                locators: vec![
                    labeled("e-?mail"),
                    bare(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}"),
                ],
            },
            FieldRule {
                field: Field::Phone,
                locators: vec![
                    labeled("phone|mobile|tel|telephone"),
                    bare(r"(?:\+?\d{1,3}[\s.\-]?)?\(?\d{3}\)?[\s.\-]?\d{3}[\s.\-]?\d{4}"),
                ],
            },
            FieldRule {
                field: Field::Address,
                locators: vec![labeled("address|location")],
            },
            FieldRule {
                field: Field::LinkedIn,
                locators: vec![
                    labeled("linkedin"),
                    bare(r"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/in/[\w\-%]+/?"),
                ],
            },
            FieldRule {
                field: Field::Github,
                locators: vec![
                    labeled("github"),
                    bare(r"(?i)(?:https?://)?(?:www\.)?github\.com/[\w\-]+/?"),
                ],
            },
            FieldRule {
                field: Field::Portfolio,
                locators: vec![labeled("portfolio|website"), Locator::OtherUrl],
            },
            FieldRule {
                field: Field::Summary,
                locators: vec![section(SUMMARY_HEADERS)],
            },
            FieldRule {
                field: Field::Experience,
                locators: vec![section(EXPERIENCE_HEADERS)],
            },
            FieldRule {
                field: Field::Education,
                locators: vec![section(EDUCATION_HEADERS)],
            },
            FieldRule {
                field: Field::Skills,
                locators: vec![section(SKILLS_HEADERS)],
            },
            FieldRule {
                field: Field::Certifications,
                locators: vec![section(CERTIFICATION_HEADERS)],
            },
            FieldRule {
                field: Field::Languages,
                locators: vec![section(LANGUAGE_HEADERS)],
            },
            FieldRule {
                field: Field::Projects,
                locators: vec![section(PROJECT_HEADERS)],
            },
            FieldRule {
                field: Field::YearsOfExperience,
                locators: vec![bare(
                    r"(?i)(\d{1,2}(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)(?:\s+of)?\s+(?:[\w\-]+\s+){0,2}?experience",
                )],
            },
        ];

        let headers = [
            SUMMARY_HEADERS,
            EXPERIENCE_HEADERS,
            EDUCATION_HEADERS,
            SKILLS_HEADERS,
            CERTIFICATION_HEADERS,
            LANGUAGE_HEADERS,
            PROJECT_HEADERS,
        ]
        .iter()
        .map(|aliases| section_regex(aliases))
        .collect();

        Self {
            rules,
            headers,
            contact_label: regex(&format!(r"(?i)^\s*(?:{CONTACT_LABELS})\s*[:\-–]")),
            url: regex(r"(?i)\bhttps?://[^\s,;|]+|\bwww\.[^\s,;|]+"),
        }
    }

    /// Runs every rule against `raw_text`. Same input, same output.
    pub fn extract_content(&self, raw_text: &str) -> Content {
        let mut content = Content::default();
        for rule in &self.rules {
            let Some(value) = rule
                .locators
                .iter()
                .find_map(|locator| self.locate(locator, raw_text))
            else {
                continue;
            };
            assign(&mut content, rule.field, value);
        }
        content.normalized()
    }

    fn locate(&self, locator: &Locator, text: &str) -> Option<String> {
        let value = match locator {
            Locator::Labeled(pattern) => pattern
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string()),
            Locator::Section(header) => self.section_block(header, text),
            Locator::Bare(pattern) => pattern
                .captures(text)
                .and_then(|c| c.get(1).or_else(|| c.get(0)))
                .map(|m| m.as_str().to_string()),
            Locator::LeadingName => self.leading_name(text),
            Locator::OtherUrl => self
                .url
                .find_iter(text)
                .map(|m| m.as_str().trim_end_matches(['.', ')']))
                .find(|url| {
                    let lower = url.to_ascii_lowercase();
                    !lower.contains("linkedin.com") && !lower.contains("github.com")
                })
                .map(String::from),
        };
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn section_block(&self, header: &Regex, text: &str) -> Option<String> {
        let mut lines = text.lines();
        let inline = lines.by_ref().find_map(|line| {
            header
                .captures(line)
                .map(|c| c.get(1).map(|m| m.as_str().to_string()).unwrap_or_default())
        })?;

        let mut block: Vec<String> = Vec::new();
        if !inline.trim().is_empty() {
            block.push(inline.trim().to_string());
        }
        for line in lines {
            if self.is_header(line) {
                break;
            }
            let line = line.trim();
            if !line.is_empty() {
                block.push(line.to_string());
            }
        }
        (!block.is_empty()).then(|| block.join("\n"))
    }

    fn is_header(&self, line: &str) -> bool {
        self.contact_label.is_match(line) || self.headers.iter().any(|h| h.is_match(line))
    }

    fn leading_name(&self, text: &str) -> Option<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !TITLE_LINES.contains(&line.to_lowercase().as_str()))
            .take(3)
            .find(|line| {
                let words = line.split_whitespace().count();
                (1..=5).contains(&words)
                    && line.chars().next().is_some_and(char::is_alphabetic)
                    && !line.contains('@')
                    && !line.contains(':')
                    && !line.chars().any(|c| c.is_ascii_digit())
                    && !self.is_header(line)
                    && !self.url.is_match(line)
            })
            .map(String::from)
    }
}

fn assign(content: &mut Content, field: Field, value: String) {
    match field {
        Field::Name => content.name = value,
        Field::Email => content.email = value,
        Field::Phone => content.phone = value,
        Field::Address => content.address = value,
        Field::LinkedIn => content.linked_in = value,
        Field::Github => content.github_profile = value,
        Field::Portfolio => content.portfolio_url = value,
        Field::Summary => content.summary = value,
        Field::Experience => content.experience = value,
        Field::Education => content.education = value,
        Field::Skills => content.skills = split_values(&value),
        Field::Certifications => content.certifications = split_values(&value),
        Field::Languages => content.languages = split_values(&value),
        Field::Projects => content.projects = split_values(&value),
        Field::YearsOfExperience => content.years_of_experience = value.parse().ok(),
    }
}

/// Splits a multi-value block on commas, semicolons and newlines, dropping bullet glyphs.
fn split_values(block: &str) -> Vec<String> {
    block
        .split([',', ';', '\n'])
        .map(|item| {
            item.trim()
                .trim_start_matches(['•', '▪', '◦', '●', '‣', '*', '-', '–'])
                .trim()
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

#[async_trait]
impl ExtractionStrategy for PatternExtractor {
    fn name(&self) -> &'static str {
        "pattern"
    }

    async fn extract(&self, raw_text: &str) -> Extraction {
        Extraction {
            content: self.extract_content(raw_text),
            skills_hint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{NOT_FOUND, UNKNOWN_NAME};

    const RESUME: &str = "\
Jane Doe
Email: jane.doe@example.com
Phone: (555) 123-4567
Address: 12 Main St, Springfield
linkedin.com/in/janedoe
https://github.com/janedoe
https://janedoe.dev

SUMMARY
Data engineer with 6 years of experience building pipelines.

EXPERIENCE
Senior Data Engineer, Acme Corp (2019 - Present)
- Built streaming ingestion on Kafka

EDUCATION
B.Sc. Computer Science, State University

Skills: Python, SQL, Leadership, Python
Certifications: AWS Certified Developer
Languages: English, Spanish
PROJECTS
• Pipeline Monitor
• Resume Parser
";

    fn extract(text: &str) -> Content {
        PatternExtractor::new().extract_content(text)
    }

    #[test]
    fn test_extracts_contact_fields() {
        let content = extract(RESUME);
        assert_eq!(content.name, "Jane Doe");
        assert_eq!(content.email, "jane.doe@example.com");
        assert_eq!(content.phone, "(555) 123-4567");
        assert_eq!(content.address, "12 Main St, Springfield");
        assert_eq!(content.linked_in, "linkedin.com/in/janedoe");
        assert_eq!(content.github_profile, "https://github.com/janedoe");
        assert_eq!(content.portfolio_url, "https://janedoe.dev");
    }

    #[test]
    fn test_extracts_sections() {
        let content = extract(RESUME);
        assert_eq!(
            content.summary,
            "Data engineer with 6 years of experience building pipelines."
        );
        assert_eq!(
            content.experience,
            "Senior Data Engineer, Acme Corp (2019 - Present)\n- Built streaming ingestion on Kafka"
        );
        assert_eq!(content.education, "B.Sc. Computer Science, State University");
        assert_eq!(content.years_of_experience, Some(6.0));
    }

    #[test]
    fn test_multi_value_fields_keep_order_and_duplicates() {
        let content = extract(RESUME);
        assert_eq!(content.skills, vec!["Python", "SQL", "Leadership", "Python"]);
        assert_eq!(content.certifications, vec!["AWS Certified Developer"]);
        assert_eq!(content.languages, vec!["English", "Spanish"]);
        assert_eq!(content.projects, vec!["Pipeline Monitor", "Resume Parser"]);
    }

    #[test]
    fn test_unmatched_fields_use_sentinels() {
        let content = extract("just some words without structure");
        assert_eq!(content.email, NOT_FOUND);
        assert_eq!(content.phone, NOT_FOUND);
        assert_eq!(content.experience, NOT_FOUND);
        assert!(content.skills.is_empty());
        assert!(content.years_of_experience.is_none());

        let empty = extract("");
        assert_eq!(empty.name, UNKNOWN_NAME);
        assert_eq!(empty, Content::default());
    }

    #[test]
    fn test_bare_shapes_used_without_labels() {
        let content = extract("John Smith\njohn@smith.io | +1 415-555-0100\n");
        assert_eq!(content.email, "john@smith.io");
        assert_eq!(content.phone, "+1 415-555-0100");
    }

    #[test]
    fn test_labeled_name_wins_over_leading_line() {
        let content = extract("CURRICULUM VITAE\nName: Maria Garcia\n");
        assert_eq!(content.name, "Maria Garcia");
    }

    #[test]
    fn test_title_line_is_skipped_for_name() {
        let content = extract("Resume\nAlex Kim\nalex@kim.dev");
        assert_eq!(content.name, "Alex Kim");
    }

    #[test]
    fn test_skills_block_under_header() {
        let text = "TECHNICAL SKILLS\n- Rust, Go\n- PostgreSQL\n\nEXPERIENCE\nEngineer";
        assert_eq!(extract(text).skills, vec!["Rust", "Go", "PostgreSQL"]);
    }

    #[test]
    fn test_sentence_mentioning_a_header_word_is_not_a_header() {
        let text = "Experience with Python is required\nSkills: Python";
        let content = extract(text);
        assert_eq!(content.experience, NOT_FOUND);
        assert_eq!(content.skills, vec!["Python"]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = PatternExtractor::new();
        let first = extractor.extract_content(RESUME);
        for _ in 0..5 {
            assert_eq!(extractor.extract_content(RESUME), first);
        }
    }

    #[tokio::test]
    async fn test_strategy_trait_returns_content_without_hint() {
        let extraction = PatternExtractor::new().extract(RESUME).await;
        assert_eq!(extraction.content.email, "jane.doe@example.com");
        assert!(extraction.skills_hint.is_none());
    }
}
