//! Skill lexicon: splits extracted skills into technical and soft buckets and
//! spots known skills in free text (used to pull keywords from job descriptions).

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::analysis::keywords::{contains_keyword, dedup_terms};
use crate::models::profile::SkillsSection;

/// Display forms of recognised technical skills.
pub const TECHNICAL_SKILLS: &[&str] = &[
    "Python", "Java", "JavaScript", "TypeScript", "Rust", "C++", "C#", "Ruby", "PHP",
    "Swift", "Kotlin", "Scala", "SQL", "NoSQL", "PostgreSQL", "MySQL", "MongoDB",
    "Redis", "Kafka", "Spark", "Hadoop", "AWS", "Azure", "GCP", "Docker", "Kubernetes",
    "Terraform", "Linux", "Git", "CI/CD", "RESTful", "GraphQL", "Microservices",
    "React", "Angular", "Vue", "Node.js", "Django", "Flask", "HTML", "CSS",
    "TensorFlow", "PyTorch", "Machine Learning", "Data Analysis", "Tableau", "Power BI",
    "Salesforce", "Jira", "Agile", "Scrum",
];

/// Display forms of recognised soft skills.
pub const SOFT_SKILLS: &[&str] = &[
    "Leadership", "Communication", "Teamwork", "Collaboration", "Problem Solving",
    "Critical Thinking", "Time Management", "Adaptability", "Creativity", "Mentoring",
    "Negotiation", "Project Management", "Stakeholder Management", "Public Speaking",
    "Attention to Detail", "Customer Service", "Conflict Resolution", "Decision Making",
    "Emotional Intelligence",
];

static SOFT_LOOKUP: Lazy<HashSet<String>> =
    Lazy::new(|| SOFT_SKILLS.iter().map(|s| s.to_lowercase()).collect());

/// Buckets skills: soft when the lexicon knows them as soft, technical otherwise.
/// Duplicates are collapsed case-insensitively here; `Content.skills` keeps them.
pub fn categorize(skills: &[String], certifications: &[String]) -> SkillsSection {
    let mut section = SkillsSection {
        certifications: dedup_terms(certifications),
        ..SkillsSection::default()
    };
    for skill in dedup_terms(skills) {
        if is_soft_skill(&skill) {
            section.soft_skills.push(skill);
        } else {
            section.technical_skills.push(skill);
        }
    }
    section
}

pub fn is_soft_skill(skill: &str) -> bool {
    SOFT_LOOKUP.contains(&skill.trim().to_lowercase())
}

/// Known lexicon skills mentioned in `text`, technical first, in lexicon order.
pub fn find_known_skills(text: &str) -> Vec<String> {
    TECHNICAL_SKILLS
        .iter()
        .chain(SOFT_SKILLS.iter())
        .filter(|skill| contains_keyword(text, skill))
        .map(|skill| skill.to_string())
        .collect()
}
