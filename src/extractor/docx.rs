use crate::error::{AnalyzerError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts the body paragraphs of a `.docx` file, dropping blank ones.
pub fn extract_paragraphs(bytes: &[u8]) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| extraction_error(format!("not a valid .docx archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| extraction_error(format!("missing {}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| extraction_error(format!("failed to read {}: {}", DOCUMENT_PART, e)))?;

    let paragraphs = parse_document_xml(&xml)?;
    let total = paragraphs.len();
    let blocks: Vec<String> = paragraphs
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect();

    tracing::debug!(
        paragraphs = total,
        non_blank = blocks.len(),
        "DOCX paragraph extraction complete"
    );

    Ok(blocks)
}

/// Returns the text of every paragraph directly under `w:body`, blank ones
/// included. Paragraphs nested in tables or text boxes are not body
/// paragraphs and are skipped.
pub(crate) fn parse_document_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<(usize, String)> = None;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| extraction_error(format!("malformed document XML: {}", e)))?;

        match event {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();

                if current.is_none()
                    && name == b"p"
                    && stack.last().is_some_and(|parent| parent == b"body")
                {
                    current = Some((stack.len(), String::new()));
                } else if let Some((depth, _)) = current {
                    if name == b"t" && is_run_child(&stack, depth) {
                        in_text = true;
                    }
                }

                stack.push(name);
            }
            Event::Empty(e) => {
                if let Some((depth, ref mut text)) = current {
                    if is_run_child(&stack, depth) {
                        match e.local_name().as_ref() {
                            b"tab" => text.push('\t'),
                            b"br" | b"cr" => text.push('\n'),
                            _ => {}
                        }
                    }
                } else if e.local_name().as_ref() == b"p"
                    && stack.last().is_some_and(|parent| parent == b"body")
                {
                    paragraphs.push(String::new());
                }
            }
            Event::Text(e) => {
                if in_text {
                    if let Some((_, ref mut text)) = current {
                        let unescaped = e.unescape().map_err(|err| {
                            extraction_error(format!("invalid text in document XML: {}", err))
                        })?;
                        text.push_str(&unescaped);
                    }
                }
            }
            Event::CData(e) => {
                if in_text {
                    if let Some((_, ref mut text)) = current {
                        text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
            }
            Event::End(e) => {
                stack.pop();
                let name = e.local_name();

                if name.as_ref() == b"t" {
                    in_text = false;
                } else if name.as_ref() == b"p"
                    && current.as_ref().is_some_and(|(depth, _)| *depth == stack.len())
                {
                    if let Some((_, text)) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// True when the element being opened sits directly inside a run of the
/// current paragraph (`p/r` or `p/hyperlink/r`).
fn is_run_child(stack: &[Vec<u8>], paragraph_depth: usize) -> bool {
    let inner = stack.get(paragraph_depth + 1..).unwrap_or_default();

    match inner {
        [run] => run.as_slice() == b"r",
        [link, run] => link.as_slice() == b"hyperlink" && run.as_slice() == b"r",
        _ => false,
    }
}

fn extraction_error(message: String) -> AnalyzerError {
    AnalyzerError::Extraction {
        format: "Word".to_string(),
        message,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;

    pub(crate) fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            body
        )
    }

    pub(crate) fn paragraph(text: &str) -> String {
        format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
    }

    pub(crate) fn build_docx(xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file(DOCUMENT_PART, options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_whitespace_only_paragraph_is_dropped() {
        let body = [
            paragraph("The delivery was quick."),
            paragraph("   "),
            paragraph("The packaging was damaged."),
        ]
        .concat();
        let docx = build_docx(&document_xml(&body));

        let blocks = extract_paragraphs(&docx).unwrap();

        assert_eq!(
            blocks,
            vec!["The delivery was quick.", "The packaging was damaged."]
        );
    }

    #[test]
    fn test_runs_are_concatenated() {
        let body = r#"<w:p><w:pPr><w:pStyle w:val="Normal"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Very</w:t></w:r><w:r><w:t xml:space="preserve"> good</w:t></w:r><w:r><w:tab/><w:t>value</w:t><w:br/><w:t>overall</w:t></w:r></w:p>"#;

        let paragraphs = parse_document_xml(&document_xml(body)).unwrap();

        assert_eq!(paragraphs, vec!["Very good\tvalue\noverall"]);
    }

    #[test]
    fn test_hyperlink_text_is_part_of_the_paragraph() {
        let body = r#"<w:p><w:r><w:t xml:space="preserve">See </w:t></w:r><w:hyperlink><w:r><w:t>the manual</w:t></w:r></w:hyperlink></w:p>"#;

        let paragraphs = parse_document_xml(&document_xml(body)).unwrap();

        assert_eq!(paragraphs, vec!["See the manual"]);
    }

    #[test]
    fn test_entities_are_unescaped() {
        let paragraphs =
            parse_document_xml(&document_xml(&paragraph("Fish &amp; chips &lt;3"))).unwrap();
        assert_eq!(paragraphs, vec!["Fish & chips <3"]);
    }

    #[test]
    fn test_table_paragraphs_are_not_body_paragraphs() {
        let body = format!(
            "{}<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>{}",
            paragraph("Before the table"),
            paragraph("Inside a cell"),
            paragraph("After the table")
        );

        let paragraphs = parse_document_xml(&document_xml(&body)).unwrap();

        assert_eq!(paragraphs, vec!["Before the table", "After the table"]);
    }

    #[test]
    fn test_empty_paragraph_elements_are_counted_then_dropped() {
        let body = format!("<w:p/>{}", paragraph("Only text"));

        assert_eq!(
            parse_document_xml(&document_xml(&body)).unwrap(),
            vec!["", "Only text"]
        );
        assert_eq!(
            extract_paragraphs(&build_docx(&document_xml(&body))).unwrap(),
            vec!["Only text"]
        );
    }

    #[test]
    fn test_archive_without_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("docProps/app.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<Properties/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let result = extract_paragraphs(&bytes);
        assert!(matches!(result, Err(AnalyzerError::Extraction { .. })));
    }

    #[test]
    fn test_not_a_zip_archive() {
        let result = extract_paragraphs(b"plain bytes");
        assert!(matches!(result, Err(AnalyzerError::Extraction { .. })));
    }
}
