//! Document loader: turns a PDF or Word file into plain resume text.

use std::path::Path;

use tracing::info;

use crate::errors::AppError;

pub mod docx;
pub mod pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Resolves the format from an explicit extension, or from the path when none is given.
    /// Anything but PDF and Word is rejected here, before the file is even opened.
    pub fn detect(path: &Path, extension: Option<&str>) -> Result<Self, AppError> {
        let extension = match extension {
            Some(ext) => ext.trim_start_matches('.').to_string(),
            None => path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" | "doc" => Ok(DocumentFormat::Docx),
            _ if extension.is_empty() => Err(AppError::UnsupportedFormat(String::new())),
            _ => Err(AppError::UnsupportedFormat(format!(".{extension}"))),
        }
    }
}

/// Reads the resume at `path` and returns its text. `format` comes from
/// [`DocumentFormat::detect`], which runs before anything else touches the file.
pub async fn load_resume(path: &Path, format: DocumentFormat) -> Result<String, AppError> {
    let bytes = tokio::fs::read(path).await?;

    let text = match format {
        DocumentFormat::Pdf => pdf::extract_text(&bytes)?,
        DocumentFormat::Docx => docx::extract_text(&bytes)?,
    };

    info!(
        "Loaded {:?} resume {} ({} chars)",
        format,
        path.display(),
        text.len()
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_detect_from_path() {
        assert_eq!(
            DocumentFormat::detect(Path::new("cv/jane.pdf"), None).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::detect(Path::new("jane.DOCX"), None).unwrap(),
            DocumentFormat::Docx
        );
        assert_eq!(
            DocumentFormat::detect(Path::new("jane.doc"), None).unwrap(),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn test_explicit_extension_overrides_path() {
        assert_eq!(
            DocumentFormat::detect(Path::new("upload.bin"), Some(".pdf")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::detect(Path::new("upload.bin"), Some("docx")).unwrap(),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = DocumentFormat::detect(Path::new("resume.txt"), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert_eq!(err.to_string(), "Unsupported file type .txt");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = load_resume(Path::new("/nonexistent/resume.pdf"), DocumentFormat::Pdf)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[tokio::test]
    async fn test_load_docx_from_disk() {
        let bytes = docx::tests::build_docx(&["Jane Doe", "Rust Engineer"]);
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        std::fs::write(file.path(), bytes).unwrap();

        let format = DocumentFormat::detect(file.path(), None).unwrap();
        let text = load_resume(file.path(), format).await.unwrap();
        assert_eq!(text, "Jane Doe\nRust Engineer\n");
    }
}
