mod config;
mod contact;
mod document;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::document::{load_resume, DocumentFormat};
use crate::extraction::ResumeExtractor;
use crate::llm_client::{LlmClient, DEFAULT_MODEL};
use crate::output::write_output;

/// Parse a resume with OpenAI GPT models.
#[derive(Debug, Parser)]
#[command(name = "resume-parser", version)]
struct Cli {
    /// Path to the resume (.pdf, .docx or .doc)
    file_path: PathBuf,

    /// Name of the chat-completion model
    #[arg(long, alias = "model_name", default_value = DEFAULT_MODEL)]
    model_name: String,

    /// Treat the file as this format instead of using its extension (e.g. ".pdf")
    #[arg(long)]
    extension: Option<String>,

    /// Directory the JSON output is written to
    #[arg(long, env = "PARSED_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (format, config) = startup(&cli)?;

    // Logs go to stderr; stdout carries only the JSON document.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_parser={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(cli, format, config).await
}

/// An unsupported file is rejected before the environment is read.
fn startup(cli: &Cli) -> Result<(DocumentFormat, Config)> {
    let format = DocumentFormat::detect(&cli.file_path, cli.extension.as_deref())?;
    let config = Config::from_env()?;
    Ok((format, config))
}

async fn run(cli: Cli, format: DocumentFormat, config: Config) -> Result<()> {
    info!("Processing {}", cli.file_path.display());

    let resume = load_resume(&cli.file_path, format).await?;

    let llm = LlmClient::new(config.llm_settings(&cli.model_name))?;
    info!("LLM client initialized (model: {})", cli.model_name);

    let (record, report) = ResumeExtractor::new(&llm, &resume).run().await?;
    for entry in report.entries.iter().filter(|e| e.used_fallback) {
        info!(
            "{} recovered through fallback: {}",
            entry.section.as_str(),
            entry.outcome
        );
    }
    if let Some(raw) = record.skills.as_raw() {
        warn!("Skills stored as free text ({} chars)", raw.len());
    }
    if let Some(raw) = record.education.as_raw() {
        warn!("Education stored as free text ({} chars)", raw.len());
    }
    info!(
        "Extracted {} positions and {} education entries",
        record.work_experience.len(),
        record.education.as_parsed().map_or(0, Vec::len)
    );

    let failed = report.failed_sections();
    if !failed.is_empty() {
        warn!(
            "Sections left at template defaults: {}",
            failed
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let output_dir = cli.output_dir.unwrap_or(config.output_dir);
    let (_, json) = write_output(&record, &output_dir, &cli.file_path).await?;
    println!("{json}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["resume-parser", "cv/jane.pdf"]).unwrap();
        assert_eq!(cli.file_path, PathBuf::from("cv/jane.pdf"));
        assert_eq!(cli.model_name, "gpt-3.5-turbo-1106");
        assert!(cli.extension.is_none());
    }

    #[test]
    fn test_cli_accepts_underscore_model_flag() {
        let cli =
            Cli::try_parse_from(["resume-parser", "jane.docx", "--model_name", "gpt-4o"]).unwrap();
        assert_eq!(cli.model_name, "gpt-4o");
    }

    #[test]
    fn test_startup_rejects_unsupported_file_before_reading_env() {
        let cli = Cli::try_parse_from(["resume-parser", "notes/resume.txt"]).unwrap();
        let err = startup(&cli).unwrap_err();
        let err = err.downcast_ref::<errors::AppError>().unwrap();
        assert_eq!(err.kind(), errors::ErrorKind::UnsupportedFormat);
        assert_eq!(err.to_string(), "Unsupported file type .txt");
    }

    #[test]
    fn test_cli_requires_file_path() {
        assert!(Cli::try_parse_from(["resume-parser"]).is_err());
    }
}
