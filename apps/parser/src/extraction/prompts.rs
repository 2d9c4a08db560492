// Prompt templates for every extraction step.
// Placeholders are filled with `str::replace` before sending.

/// Basic details, JSON mode. Replace `{resume}`.
pub const BASIC_DETAILS_PROMPT: &str = r#"You are reading a candidate's resume.

Return a JSON object with these keys:
{
  "name": "full name of the candidate",
  "job_title": "current or most recent job title",
  "bio": "a two or three sentence professional summary written in the third person",
  "location": "city and country of the candidate, if stated",
  "phone": "phone number exactly as written, if stated"
}

Omit "location" and "phone" when the resume does not state them.
Use an empty string for "name", "job_title" or "bio" when they cannot be determined.

RESUME:
{resume}"#;

/// Skills, JSON mode. Replace `{resume}`.
pub const SKILLS_PROMPT: &str = r#"You are reading a candidate's resume.

Return a JSON object with these keys:
{
  "skills": ["each technical or professional skill as a short string"],
  "professional_development": ["each certification, course or training, as a short string"],
  "other": "anything else worth noting (languages spoken, awards, interests) as a single string"
}

"skills" is required. Omit "professional_development" and "other" when the resume has nothing for them.

RESUME:
{resume}"#;

/// Skills fallback, free text. Replace `{resume}`.
pub const SKILLS_FALLBACK_PROMPT: &str = "What are the skills in this resume ?
RESUME:
{resume}

Answer with a comma separated list.";

/// Education fallback, free text. Replace `{resume}`.
pub const EDUCATION_FALLBACK_PROMPT: &str = "List the education history found in this resume.
For each entry give the institution, the degree, the field of study and the dates, one entry per line.

RESUME:
{resume}";

/// Work-experience fallback, phase 1, free text. Replace `{resume}`.
pub const COMPANIES_PROMPT: &str = "List every company the candidate worked for in this resume, together with the role held there.

Answer with one line per position, formatted exactly as:
company name, role

Do not number the lines and do not add any other text.

RESUME:
{resume}";

/// Work-experience fallback, phase 2, JSON mode.
/// Replace `{resume}`, `{company}` and `{role}`.
pub const WORK_EXPERIENCE_PROMPT: &str = r#"You are reading a candidate's resume.

Extract the candidate's experience at the company "{company}" (role: "{role}").

Return a JSON object with these keys:
{
  "company": "{company}",
  "role": "job title held at the company",
  "start_date": "start date as written",
  "end_date": "end date as written, or \"Present\"",
  "location": "city or country of the position",
  "responsibilities": ["each responsibility or achievement as one string"]
}

"company" is required. Omit any other key the resume does not support.

RESUME:
{resume}"#;

pub fn fill_resume(template: &str, resume: &str) -> String {
    template.replace("{resume}", resume)
}

/// The resume is substituted last so that braces inside it are never treated as placeholders.
pub fn fill_work_experience(resume: &str, company: &str, role: &str) -> String {
    WORK_EXPERIENCE_PROMPT
        .replace("{company}", company)
        .replace("{role}", role)
        .replace("{resume}", resume)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_resume_replaces_placeholder() {
        let prompt = fill_resume(SKILLS_FALLBACK_PROMPT, "Python, SQL");
        assert!(prompt.contains("RESUME:\nPython, SQL"));
        assert!(!prompt.contains("{resume}"));
    }

    #[test]
    fn test_fill_work_experience_keeps_resume_braces() {
        let prompt = fill_work_experience("Built {company} tooling", "Acme", "Engineer");
        assert!(prompt.contains(r#"company "Acme" (role: "Engineer")"#));
        assert!(prompt.contains("Built {company} tooling"));
    }

    #[test]
    fn test_every_template_has_resume_placeholder() {
        for template in [
            BASIC_DETAILS_PROMPT,
            SKILLS_PROMPT,
            SKILLS_FALLBACK_PROMPT,
            EDUCATION_FALLBACK_PROMPT,
            COMPANIES_PROMPT,
            WORK_EXPERIENCE_PROMPT,
        ] {
            assert!(template.contains("{resume}"));
        }
    }
}
