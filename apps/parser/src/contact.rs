//! Contact details pulled straight out of the resume text with regexes.
//! These never depend on model output.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Every email address in `text`, first-seen order, duplicates removed.
pub fn extract_emails(text: &str) -> Vec<String> {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let email_re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
    });
    dedup(email_re.find_iter(text).map(|m| m.as_str().to_string()))
}

/// GitHub and LinkedIn profile URLs in `text`, first-seen order, duplicates removed.
pub fn extract_profile_urls(text: &str) -> Vec<String> {
    static PROFILE_URL_RE: OnceLock<Regex> = OnceLock::new();
    let profile_url_re = PROFILE_URL_RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:https?://)?(?:www\.)?(?:github\.com|linkedin\.com/in|linkedin\.com/pub)/[A-Za-z0-9_./-]+",
        )
        .expect("valid profile url regex")
    });
    dedup(
        profile_url_re
            .find_iter(text)
            .map(|m| m.as_str().trim_end_matches(['.', '/']).to_string()),
    )
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}
