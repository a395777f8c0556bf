// Prompt constants for job-match evaluation.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{fill_template, json_system, UNTRUSTED_INPUT_INSTRUCTION};

/// Score above which suggestions are produced.
pub const SUGGESTION_THRESHOLD: u32 = 50;

const JOB_MATCH_ROLE: &str = "You are an expert ATS (applicant tracking system) analyst and \
    technical recruiter. Compare a candidate's résumé against a job description.";

/// Job-match prompt template. Filled by `job_match_prompt` in a single pass over
/// `{job_role}`, `{job_description}`, `{required_keywords}`, `{resume_label}`,
/// `{resume_context}` and `{untrusted}`.
pub const JOB_MATCH_PROMPT_TEMPLATE: &str = r#"Evaluate how well the candidate matches the job{job_role}.

Return a JSON object with this EXACT schema (no extra fields):
{
  "matchScore": 0,
  "missingKeywords": ["string"],
  "suggestions": ["string"],
  "strengths": ["string"],
  "gaps": ["string"],
  "recommendations": "string"
}

Rules:
- matchScore is an integer from 0 to 100 measuring how well the candidate's keywords and experience overlap the job requirements.
- missingKeywords lists important job-description keywords absent from the résumé, exactly as written in the job description.
- strengths lists requirements the candidate clearly meets; gaps lists requirements they do not.
- recommendations is one short paragraph of overall advice.
- ONLY if matchScore is greater than 50, fill suggestions with concrete résumé improvements. If matchScore is 50 or lower, suggestions MUST be an empty array [].

{untrusted}

Job description:
"""
{job_description}
"""
{required_keywords}
{resume_label}:
"""
{resume_context}
"""
"#;

pub fn job_match_system() -> String {
    json_system(JOB_MATCH_ROLE)
}

pub fn job_match_prompt(
    job_description: &str,
    resume_label: &str,
    resume_context: &str,
    job_role: Option<&str>,
    job_keywords: &[String],
) -> String {
    let job_role = job_role
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| format!(" for the role \"{r}\""))
        .unwrap_or_default();

    let keywords: Vec<&str> = job_keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    let required_keywords = if keywords.is_empty() {
        String::new()
    } else {
        let lines: Vec<String> = keywords.iter().map(|k| format!("- {k}")).collect();
        format!(
            "\nRequired keywords (treat each as a job requirement; list any the résumé lacks in missingKeywords):\n{}\n",
            lines.join("\n")
        )
    };

    fill_template(
        JOB_MATCH_PROMPT_TEMPLATE,
        &[
            ("job_role", job_role.as_str()),
            ("untrusted", UNTRUSTED_INPUT_INSTRUCTION.trim()),
            ("resume_label", resume_label),
            ("job_description", job_description),
            ("required_keywords", required_keywords.as_str()),
            ("resume_context", resume_context),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_states_the_suggestion_threshold() {
        let prompt = job_match_prompt("Rust engineer", "Résumé skills", "Rust, Go", None, &[]);
        assert!(prompt.contains("ONLY if matchScore is greater than 50"));
        assert!(prompt.contains("suggestions MUST be an empty array"));
    }

    #[test]
    fn test_prompt_embeds_inputs_and_role() {
        let prompt = job_match_prompt(
            "We need Python and AWS",
            "Résumé skills",
            "Python, SQL",
            Some("Data Engineer"),
            &[],
        );
        assert!(prompt.contains("for the role \"Data Engineer\""));
        assert!(prompt.contains("We need Python and AWS"));
        assert!(prompt.contains("Résumé skills:\n\"\"\"\nPython, SQL"));
        assert!(!prompt.contains("{resume_context}"));
        assert!(!prompt.contains("{job_role}"));
        assert!(!prompt.contains("{required_keywords}"));
        assert!(!prompt.contains("Required keywords"));
    }

    #[test]
    fn test_caller_keywords_are_listed_as_requirements() {
        let keywords = vec!["Kubernetes".to_string(), "  ".to_string(), "Terraform".to_string()];
        let prompt = job_match_prompt("Platform engineer", "Résumé skills", "Go", None, &keywords);
        assert!(prompt.contains("Required keywords"));
        assert!(prompt.contains("- Kubernetes\n- Terraform\n"));
        let required = prompt.find("Required keywords").unwrap();
        assert!(required > prompt.find("Platform engineer").unwrap());
        assert!(required < prompt.find("Résumé skills:").unwrap());
    }

    #[test]
    fn test_placeholder_text_in_job_description_stays_literal() {
        let prompt = job_match_prompt(
            "Paste {resume_context} and {untrusted} here",
            "Résumé skills",
            "Python, SQL",
            None,
            &[],
        );
        assert!(prompt.contains("Paste {resume_context} and {untrusted} here"));
        assert_eq!(prompt.matches("Python, SQL").count(), 1);
    }

    #[test]
    fn test_blank_role_is_omitted() {
        let prompt = job_match_prompt("JD", "Résumé text", "text", Some("  "), &[]);
        assert!(prompt.starts_with("Evaluate how well the candidate matches the job."));
    }
}
