//! Word (.docx) text extraction.
//!
//! A .docx file is a zip archive; the body lives in `word/document.xml`. Only
//! paragraphs that are direct children of `w:body` are emitted, in document
//! order, each followed by a newline. Table cells and text boxes are skipped.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::errors::AppError;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_text(bytes: &[u8]) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::Document(format!("Not a Word document: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| AppError::Document(format!("Missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)?;

    paragraphs_from_xml(&xml)
}

fn paragraphs_from_xml(xml: &str) -> Result<String, AppError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraph: Option<String> = None;
    let mut content = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| AppError::Document(format!("Malformed {DOCUMENT_PART}: {e}")))?;

        match event {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"p" && is_body_child(&stack) {
                    paragraph = Some(String::new());
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = e.local_name();
                if name.as_ref() == b"p" && is_body_child(&stack) {
                    content.push('\n');
                } else if let Some(text) = paragraph.as_mut() {
                    if in_run(&stack) {
                        match name.as_ref() {
                            b"tab" => text.push('\t'),
                            b"br" | b"cr" => text.push('\n'),
                            _ => {}
                        }
                    }
                }
            }
            Event::Text(t) => {
                if let Some(text) = paragraph.as_mut() {
                    if in_run_text(&stack) {
                        let unescaped = t.unescape().map_err(|e| {
                            AppError::Document(format!("Malformed {DOCUMENT_PART}: {e}"))
                        })?;
                        text.push_str(&unescaped);
                    }
                }
            }
            Event::End(_) => {
                let name = stack.pop();
                if name.as_deref() == Some(b"p".as_slice()) && is_body_child(&stack) {
                    if let Some(text) = paragraph.take() {
                        content.push_str(&text);
                        content.push('\n');
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(content)
}

fn is_body_child(stack: &[Vec<u8>]) -> bool {
    matches!(stack, [document, body] if document == b"document" && body == b"body")
}

fn in_textbox(stack: &[Vec<u8>]) -> bool {
    stack.iter().any(|name| name == b"txbxContent")
}

fn in_run(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|name| name == b"r") && !in_textbox(stack)
}

fn in_run_text(stack: &[Vec<u8>]) -> bool {
    matches!(stack, [.., run, text] if run == b"r" && text == b"t") && !in_textbox(stack)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    fn wrap_body(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
        )
    }

    fn zip_document(xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buffer);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            zip.start_file(DOCUMENT_PART, options).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buffer.into_inner()
    }

    /// Builds a minimal .docx with one paragraph per line.
    pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#))
            .collect();
        zip_document(&wrap_body(&body))
    }

    #[test]
    fn test_paragraphs_in_document_order() {
        let bytes = build_docx(&["Jane Doe", "jane@example.com", "Skills: Rust, SQL"]);
        let text = extract_text(&bytes).unwrap();
        assert_eq!(text, "Jane Doe\njane@example.com\nSkills: Rust, SQL\n");
    }

    #[test]
    fn test_runs_tabs_breaks_and_entities() {
        let body = r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Jane</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve"> Doe &amp; Co</w:t><w:br/><w:t>Engineer</w:t></w:r></w:p><w:p/><w:p><w:hyperlink><w:r><w:t>github.com/jane</w:t></w:r></w:hyperlink></w:p>"#;
        let text = paragraphs_from_xml(&wrap_body(body)).unwrap();
        assert_eq!(text, "Jane\t Doe & Co\nEngineer\n\ngithub.com/jane\n");
    }

    #[test]
    fn test_table_paragraphs_are_skipped() {
        let body = r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>After</w:t></w:r></w:p>"#;
        let text = paragraphs_from_xml(&wrap_body(body)).unwrap();
        assert_eq!(text, "Before\nAfter\n");
    }

    #[test]
    fn test_not_a_zip_is_document_error() {
        let err = extract_text(b"\xD0\xCF\x11\xE0 legacy binary doc").unwrap_err();
        assert!(matches!(err, AppError::Document(_)));
    }
}
