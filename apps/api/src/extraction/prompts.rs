// Prompt constants for the generative extraction strategy.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{fill_template, json_system, UNTRUSTED_INPUT_INSTRUCTION};

const EXTRACTION_ROLE: &str = "You are an expert résumé parser and ATS (applicant tracking \
    system) analyst. Extract the candidate profile from résumé text exactly as written.";

/// Extraction prompt template. Filled by `extraction_prompt` over `{untrusted}` and `{resume_text}`.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the candidate profile and an ATS analysis from the résumé below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "content": {
    "name": "string",
    "email": "string",
    "phone": "string",
    "address": "string",
    "linkedIn": "string",
    "githubProfile": "string",
    "portfolioUrl": "string",
    "education": "string",
    "experience": "string",
    "skills": ["string"],
    "certifications": ["string"],
    "languages": ["string"],
    "projects": ["string"],
    "summary": "string",
    "yearsOfExperience": 0
  },
  "analysis": {
    "contentQuality": {
      "hasProfessionalSummary": false,
      "contactInfoPresent": {
        "email": false, "phone": false, "address": false,
        "linkedIn": false, "github": false, "portfolio": false
      },
      "skillsSection": {
        "technicalSkills": ["string"],
        "softSkills": ["string"],
        "certifications": ["string"]
      }
    }
  }
}

Rules:
- Copy values verbatim from the résumé. Do not invent employers, dates or skills.
- Use "Unknown" for a missing name and "Not found" for any other missing text field.
- Use [] for missing lists and null for yearsOfExperience when it is not stated.
- "skills" lists every skill in the order it appears, duplicates included.
- "experience" and "education" keep the original line breaks.
- technicalSkills holds tools, languages and platforms; softSkills holds interpersonal skills.

{untrusted}

Résumé text:
"""
{resume_text}
"""
"#;

pub fn extraction_system() -> String {
    json_system(EXTRACTION_ROLE)
}

pub fn extraction_prompt(resume_text: &str) -> String {
    fill_template(
        EXTRACTION_PROMPT_TEMPLATE,
        &[
            ("untrusted", UNTRUSTED_INPUT_INSTRUCTION.trim()),
            ("resume_text", resume_text),
        ],
    )
}
