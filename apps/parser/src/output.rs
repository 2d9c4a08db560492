//! Output aggregator: owns the record for one run and writes it out at the end.
//!
//! Every extraction step writes only to its own keys through one setter; no
//! step reads another step's output.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::sections::{BasicInfo, SectionOutcome, SkillsExtract};
use crate::models::{Education, OutputRecord, SectionField, WorkExperience};

#[derive(Debug, Default)]
pub struct OutputAggregator {
    record: OutputRecord,
}

impl OutputAggregator {
    pub fn new() -> Self {
        Self {
            record: OutputRecord::template(),
        }
    }

    pub fn into_record(self) -> OutputRecord {
        self.record
    }

    /// Keys absent from the answer keep their template value.
    pub fn set_basic_info(&mut self, info: BasicInfo) {
        let record = &mut self.record;
        if let Some(name) = info.name {
            record.candidate_name = name;
        }
        if let Some(job_title) = info.job_title {
            record.job_title = job_title;
        }
        if let Some(bio) = info.bio {
            record.bio = bio;
        }
        if let Some(location) = info.location {
            record.contact_info.location = location;
        }
        if let Some(phone) = info.phone {
            record.contact_info.phone_number = phone;
        }
    }

    pub fn set_contacts(&mut self, emails: Vec<String>, urls: Vec<String>) {
        self.record.contact_info.email_address = emails;
        self.record.contact_info.personal_urls = urls;
    }

    pub fn set_skills(&mut self, outcome: SectionOutcome<SkillsExtract>) {
        match outcome {
            SectionOutcome::Success(extract) => {
                self.record.skills = SectionField::Parsed(extract.skills);
                if let Some(development) = extract.professional_development {
                    self.record.professional_development = development;
                }
                if let Some(other) = extract.other {
                    self.record.other_info = other;
                }
            }
            SectionOutcome::PartialSuccess(raw) => self.record.skills = SectionField::Raw(raw),
            SectionOutcome::Failure(_) => {}
        }
    }

    pub fn set_education(&mut self, outcome: SectionOutcome<Vec<Education>>) {
        match outcome {
            SectionOutcome::Success(entries) => {
                self.record.education = SectionField::Parsed(entries)
            }
            SectionOutcome::PartialSuccess(raw) => self.record.education = SectionField::Raw(raw),
            SectionOutcome::Failure(_) => {}
        }
    }

    pub fn set_work_experience(&mut self, outcome: SectionOutcome<Vec<WorkExperience>>) {
        match outcome {
            SectionOutcome::Success(entries) => self.record.work_experience.extend(entries),
            SectionOutcome::PartialSuccess(_) => {
                warn!("Work experience has no free-text representation, keeping template value")
            }
            SectionOutcome::Failure(_) => {}
        }
    }
}

/// `<output_dir>/<input file stem>_output.json`
pub fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    output_dir.join(format!("{stem}_output.json"))
}

/// Serializes the record as indented JSON and writes it next to the other parsed outputs.
/// Returns the path written and the JSON text, so the caller can echo it.
pub async fn write_output(
    record: &OutputRecord,
    output_dir: &Path,
    input: &Path,
) -> Result<(PathBuf, String), AppError> {
    let json = serde_json::to_string_pretty(record)?;

    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_path(output_dir, input);
    tokio::fs::write(&path, &json).await?;

    info!("Saved to: {}", path.display());
    Ok((path, json))
}
