//! Per-section results and the run report.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{AppError, ErrorKind};
use crate::llm_client::lenient::strip_json_fences;
use crate::models::entries::null_as_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    BasicInfo,
    WorkExperience,
    Skills,
    Education,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::BasicInfo => "basic_info",
            Section::WorkExperience => "work_experience",
            Section::Skills => "skills",
            Section::Education => "education",
        }
    }
}

/// What one section produced.
///
/// `PartialSuccess` carries the raw text of a free-text fallback answer, which
/// callers must store differently from a structured `Success`.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionOutcome<T> {
    Success(T),
    PartialSuccess(String),
    Failure(ErrorKind),
}

impl<T> SectionOutcome<T> {
    pub fn failure(&self) -> Option<ErrorKind> {
        match self {
            SectionOutcome::Failure(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectionOutcome::Success(_) => "success",
            SectionOutcome::PartialSuccess(_) => "partial",
            SectionOutcome::Failure(kind) => kind.as_str(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportEntry {
    pub section: Section,
    pub outcome: &'static str,
    pub failure: Option<ErrorKind>,
    pub used_fallback: bool,
    pub elapsed: Duration,
}

/// Section-by-section summary of a run. Logged, never written into the output record.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub entries: Vec<ReportEntry>,
}

impl ExtractionReport {
    pub fn record<T>(
        &mut self,
        section: Section,
        outcome: &SectionOutcome<T>,
        used_fallback: bool,
        elapsed: Duration,
    ) {
        self.entries.push(ReportEntry {
            section,
            outcome: outcome.label(),
            failure: outcome.failure(),
            used_fallback,
            elapsed,
        });
    }

    #[cfg(test)]
    pub fn entry(&self, section: Section) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.section == section)
    }

    pub fn failed_sections(&self) -> Vec<Section> {
        self.entries
            .iter()
            .filter(|e| e.failure.is_some())
            .map(|e| e.section)
            .collect()
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            if !out.is_empty() {
                out.push_str(", ");
            }
            let _ = write!(
                out,
                "{}={}{} ({:.2}s)",
                entry.section.as_str(),
                if entry.used_fallback { "fallback:" } else { "" },
                entry.outcome,
                entry.elapsed.as_secs_f64()
            );
        }
        out
    }
}

/// Basic details from the JSON-mode answer. Each key is looked up on its own:
/// a missing or non-string value leaves that field unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicInfo {
    pub name: Option<String>,
    pub job_title: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
}

impl BasicInfo {
    pub fn from_response(text: &str) -> Result<Self, AppError> {
        let value: Value = serde_json::from_str(strip_json_fences(text))?;
        let Some(object) = value.as_object() else {
            return Err(AppError::Parse(format!(
                "basic info answer is not a JSON object: {value}"
            )));
        };

        let field = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            name: field("name"),
            job_title: field("job_title"),
            bio: field("bio"),
            location: field("location"),
            phone: field("phone"),
        })
    }
}

/// Skills answer. `skills` is required, the rest is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillsExtract {
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    pub professional_development: Option<Vec<String>>,
    pub other: Option<String>,
}

impl SkillsExtract {
    pub fn from_response(text: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(strip_json_fences(text))?)
    }
}
