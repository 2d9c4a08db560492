use crate::errors::AppError;

/// Extracts the text of a PDF, keeping only non-blank lines.
pub fn extract_text(bytes: &[u8]) -> Result<String, AppError> {
    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Document(format!("Failed to extract text from PDF: {e}")))?;
    Ok(normalize_lines(&raw))
}

/// Right-trims every line, drops the empty ones and terminates each kept line with `\n`.
pub fn normalize_lines(raw: &str) -> String {
    let mut content = String::with_capacity(raw.len());
    for line in raw.lines() {
        let line = line.trim_end();
        if !line.is_empty() {
            content.push_str(line);
            content.push('\n');
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_blank_lines_and_trailing_spaces() {
        let raw = "\n\nJane Doe   \n\n  Rust Engineer\t\n\x0c\nSkills: Rust, SQL\n";
        assert_eq!(
            normalize_lines(raw),
            "Jane Doe\n  Rust Engineer\nSkills: Rust, SQL\n"
        );
    }

    #[test]
    fn test_normalize_blank_document_is_empty() {
        assert_eq!(normalize_lines("  \n\n \t\n"), "");
    }

    #[test]
    fn test_garbage_bytes_are_a_document_error() {
        let err = extract_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, AppError::Document(_)));
    }
}
