//! Resume extraction: drives one model-backed step per output section.
//!
//! Flow: basic info → work experience → skills → education, strictly in order.
//!
//! Each section tries its primary call first. Only a timeout sends it to its
//! fallback, and the fallback runs once. Any other error aborts the run.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::contact::{extract_emails, extract_profile_urls};
use crate::errors::{AppError, ErrorKind};
use crate::extraction::companies::parse_positions;
use crate::extraction::prompts::{
    fill_resume, fill_work_experience, BASIC_DETAILS_PROMPT, COMPANIES_PROMPT,
    EDUCATION_FALLBACK_PROMPT, SKILLS_FALLBACK_PROMPT, SKILLS_PROMPT,
};
use crate::extraction::sections::{
    BasicInfo, ExtractionReport, Section, SectionOutcome, SkillsExtract,
};
use crate::llm_client::{lenient, ModelClient};
use crate::models::{Education, Extractable, OutputRecord, WorkExperience};
use crate::output::OutputAggregator;

pub struct ResumeExtractor<'a> {
    llm: &'a dyn ModelClient,
    resume: &'a str,
    output: OutputAggregator,
    report: ExtractionReport,
}

impl<'a> ResumeExtractor<'a> {
    pub fn new(llm: &'a dyn ModelClient, resume: &'a str) -> Self {
        Self {
            llm,
            resume,
            output: OutputAggregator::new(),
            report: ExtractionReport::default(),
        }
    }

    /// Runs every section and returns the filled record with a per-section report.
    pub async fn run(mut self) -> Result<(OutputRecord, ExtractionReport), AppError> {
        info!("Extracting resume sections with {}", self.llm.model());

        self.extract_basic_info().await?;
        self.extract_work_experience().await?;
        self.extract_skills().await?;
        self.extract_education().await?;

        info!("Extraction finished: {}", self.report.summary());
        Ok((self.output.into_record(), self.report))
    }

    // ────────────────────────────────────────────────────────────────────────
    // Sections
    // ────────────────────────────────────────────────────────────────────────

    async fn extract_basic_info(&mut self) -> Result<(), AppError> {
        let started = Instant::now();
        let prompt = fill_resume(BASIC_DETAILS_PROMPT, self.resume);

        let outcome = match self.query(&prompt, true).await {
            Ok(text) => {
                let info = BasicInfo::from_response(&text)?;
                debug!("# Basic Info Extract:\n{:?}", info);
                SectionOutcome::Success(info)
            }
            Err(e) if e.is_timeout() => {
                warn!("Basic info extraction timed out");
                SectionOutcome::Failure(ErrorKind::Timeout)
            }
            Err(e) => return Err(e),
        };
        info!(
            "# Basic Info Extraction took {:.2} seconds",
            started.elapsed().as_secs_f64()
        );

        self.report
            .record(Section::BasicInfo, &outcome, false, started.elapsed());
        if let SectionOutcome::Success(info) = outcome {
            self.output.set_basic_info(info);
        }

        // Contact details never depend on the model.
        self.output.set_contacts(
            extract_emails(self.resume),
            extract_profile_urls(self.resume),
        );
        Ok(())
    }

    async fn extract_work_experience(&mut self) -> Result<(), AppError> {
        let started = Instant::now();

        let (outcome, used_fallback) = match self.extract_entries::<WorkExperience>().await {
            Ok(entries) => (SectionOutcome::Success(entries), false),
            Err(e) if e.is_timeout() => {
                warn!("Work extraction timed out");
                (self.fallback_work_experience().await?, true)
            }
            Err(e) => return Err(e),
        };

        self.report.record(
            Section::WorkExperience,
            &outcome,
            used_fallback,
            started.elapsed(),
        );
        self.output.set_work_experience(outcome);
        Ok(())
    }

    async fn extract_skills(&mut self) -> Result<(), AppError> {
        let started = Instant::now();
        let prompt = fill_resume(SKILLS_PROMPT, self.resume);

        let (outcome, used_fallback) = match self.query(&prompt, true).await {
            Ok(text) => {
                let extract = SkillsExtract::from_response(&text)?;
                debug!("# Skills Extract:\n{:?}", extract);
                info!(
                    "# Skills Extraction took {:.2} seconds",
                    started.elapsed().as_secs_f64()
                );
                (SectionOutcome::Success(extract), false)
            }
            Err(e) if e.is_timeout() => {
                warn!("Skills extraction timed out");
                (self.fallback_free_text(SKILLS_FALLBACK_PROMPT).await?, true)
            }
            Err(e) => return Err(e),
        };

        self.report
            .record(Section::Skills, &outcome, used_fallback, started.elapsed());
        self.output.set_skills(outcome);
        Ok(())
    }

    async fn extract_education(&mut self) -> Result<(), AppError> {
        let started = Instant::now();

        let (outcome, used_fallback) = match self.extract_entries::<Education>().await {
            Ok(entries) => (SectionOutcome::Success(entries), false),
            Err(e) if e.is_timeout() => {
                warn!("Education extraction timed out");
                (self.fallback_free_text(EDUCATION_FALLBACK_PROMPT).await?, true)
            }
            Err(e) => return Err(e),
        };

        self.report
            .record(Section::Education, &outcome, used_fallback, started.elapsed());
        self.output.set_education(outcome);
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Fallbacks
    // ────────────────────────────────────────────────────────────────────────

    /// Asks a free-text question and keeps the answer verbatim.
    async fn fallback_free_text<T>(&self, template: &str) -> Result<SectionOutcome<T>, AppError> {
        let prompt = fill_resume(template, self.resume);
        match self.query(&prompt, false).await {
            Ok(text) => Ok(SectionOutcome::PartialSuccess(text)),
            Err(e) if e.is_timeout() => {
                warn!("Fallback extraction timed out, keeping template value");
                Ok(SectionOutcome::Failure(ErrorKind::Timeout))
            }
            Err(e) => Err(e),
        }
    }

    /// Lists `company, role` pairs first, then asks for each position separately.
    /// A timed-out position is skipped; the others are kept.
    async fn fallback_work_experience(
        &self,
    ) -> Result<SectionOutcome<Vec<WorkExperience>>, AppError> {
        let prompt = fill_resume(COMPANIES_PROMPT, self.resume);
        let listing = match self.query(&prompt, false).await {
            Ok(text) => text,
            Err(e) if e.is_timeout() => {
                warn!("Company enumeration timed out, keeping template value");
                return Ok(SectionOutcome::Failure(ErrorKind::Timeout));
            }
            Err(e) => return Err(e),
        };

        let positions = parse_positions(&listing);
        info!("Work fallback found {} positions", positions.len());

        let mut entries = Vec::with_capacity(positions.len());
        for position in positions {
            let prompt = fill_work_experience(self.resume, &position.company, &position.role);
            match self.query(&prompt, true).await {
                Ok(text) => entries.push(lenient::parse::<WorkExperience>(&text)?),
                Err(e) if e.is_timeout() => {
                    warn!(
                        "Experience extraction for {} timed out, skipping",
                        position.company
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(SectionOutcome::Success(entries))
    }

    // ────────────────────────────────────────────────────────────────────────
    // Model calls
    // ────────────────────────────────────────────────────────────────────────

    async fn query(&self, prompt: &str, json_mode: bool) -> Result<String, AppError> {
        let completion = self.llm.complete(prompt, json_mode).await?;
        debug!(
            "Completion ({} chars, json_mode={}) took {:.2} seconds",
            completion.output.len(),
            json_mode,
            completion.elapsed.as_secs_f64()
        );
        Ok(completion.output)
    }

    /// Schema-guided extraction; every returned object must deserialize into `T`.
    async fn extract_entries<T: Extractable>(&self) -> Result<Vec<T>, AppError> {
        let schema = T::schema();
        let completion = self.llm.extract(&schema, self.resume).await?;
        debug!("# {} Extract:\n{:?}", schema.name, completion.output);
        info!(
            "# {} Extraction took {:.2} seconds",
            schema.name,
            completion.elapsed.as_secs_f64()
        );

        completion
            .output
            .into_iter()
            .map(|value| {
                serde_json::from_value(value)
                    .map_err(|e| AppError::Parse(format!("invalid {} entry: {e}", schema.name)))
            })
            .collect()
    }
}
