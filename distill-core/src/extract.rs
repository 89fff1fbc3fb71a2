//! Text extraction for uploaded documents.
//!
//! Dispatches on the declared media type: plain text is decoded directly,
//! PDFs go through `lopdf`, DOCX files are unzipped and their
//! `word/document.xml` body is read with `quick-xml`.

use lopdf::Document;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Upper bound on the decompressed size of `word/document.xml`
const MAX_DOCX_XML_BYTES: u64 = 50 * 1024 * 1024;

/// Errors that can occur during text extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to read DOCX: {0}")]
    Docx(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// True when a supported document could not be parsed
    pub fn is_extraction_failure(&self) -> bool {
        !matches!(self, ExtractError::UnsupportedMediaType(_))
    }
}

impl From<lopdf::Error> for ExtractError {
    fn from(e: lopdf::Error) -> Self {
        ExtractError::Pdf(e.to_string())
    }
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(e: zip::result::ZipError) -> Self {
        ExtractError::Docx(e.to_string())
    }
}

impl From<quick_xml::Error> for ExtractError {
    fn from(e: quick_xml::Error) -> Self {
        ExtractError::Docx(e.to_string())
    }
}

/// Document formats the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    PlainText,
    Pdf,
    Docx,
}

impl MediaType {
    /// Resolve a declared MIME type, ignoring parameters and case
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(MIME_TEXT) {
            Some(MediaType::PlainText)
        } else if essence.eq_ignore_ascii_case(MIME_PDF) {
            Some(MediaType::Pdf)
        } else if essence.eq_ignore_ascii_case(MIME_DOCX) {
            Some(MediaType::Docx)
        } else {
            None
        }
    }

    /// Resolve a file extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "text" | "md" => Some(MediaType::PlainText),
            "pdf" => Some(MediaType::Pdf),
            "docx" => Some(MediaType::Docx),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::PlainText => MIME_TEXT,
            MediaType::Pdf => MIME_PDF,
            MediaType::Docx => MIME_DOCX,
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::PlainText => write!(f, "text"),
            MediaType::Pdf => write!(f, "PDF"),
            MediaType::Docx => write!(f, "DOCX"),
        }
    }
}

/// Text pulled out of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
}

impl ExtractedText {
    fn new(mut text: String) -> Self {
        text.truncate(text.trim_end().len());
        Self { text }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Extract text from `bytes` according to the declared `media_type`.
///
/// Unsupported types are rejected before any parsing happens.
pub fn extract(bytes: &[u8], media_type: &str) -> Result<ExtractedText, ExtractError> {
    let kind = MediaType::from_mime(media_type)
        .ok_or_else(|| ExtractError::UnsupportedMediaType(media_type.to_string()))?;
    extract_as(bytes, kind)
}

/// Extract text from `bytes` known to be of type `kind`
pub fn extract_as(bytes: &[u8], kind: MediaType) -> Result<ExtractedText, ExtractError> {
    debug!("Extracting {} bytes as {}", bytes.len(), kind);

    let text = match kind {
        MediaType::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        MediaType::Pdf => extract_pdf(bytes)?,
        MediaType::Docx => extract_docx(bytes)?,
    };

    Ok(ExtractedText::new(text))
}

/// Extract text from a local file, picking the format from its extension
pub fn extract_file(path: &Path) -> Result<ExtractedText, ExtractError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let kind = MediaType::from_extension(ext)
        .ok_or_else(|| ExtractError::UnsupportedMediaType(format!(".{}", ext)))?;

    let bytes = std::fs::read(path)?;
    extract_as(&bytes, kind)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes)?;

    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(ExtractError::Pdf("PDF has no pages".to_string()));
    }

    debug!("PDF has {} pages", pages.len());

    // get_pages is keyed by 1-based page number, so iteration is in page order
    let mut texts = Vec::with_capacity(pages.len());
    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) => texts.push(text.trim().to_string()),
            Err(e) => warn!("Skipping unreadable PDF page {}: {}", page_num, e),
        }
    }

    Ok(texts
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n"))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let mut xml = Vec::new();
    {
        let entry = archive.by_name("word/document.xml")?;
        entry.take(MAX_DOCX_XML_BYTES).read_to_end(&mut xml)?;
    }
    if xml.len() as u64 >= MAX_DOCX_XML_BYTES {
        return Err(ExtractError::Docx(
            "word/document.xml exceeds size limit".to_string(),
        ));
    }

    docx_body_text(&xml)
}

/// Collect `<w:t>` runs, one line per `<w:p>` paragraph
fn docx_body_text(xml: &[u8]) -> Result<String, ExtractError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" | b"p" => out.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                out.push_str(&text);
            }
            Event::CData(t) if in_text => {
                out.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

/// In-memory documents for extraction and upload tests
#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    /// DOCX archive whose `word/document.xml` body is `body`
    pub fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    /// PDF with one line of Courier text per page
    pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{docx_with_body, pdf_with_pages};
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_media_type_resolution() {
        assert_eq!(MediaType::from_mime("text/plain"), Some(MediaType::PlainText));
        assert_eq!(
            MediaType::from_mime("text/plain; charset=utf-8"),
            Some(MediaType::PlainText)
        );
        assert_eq!(MediaType::from_mime("Application/PDF"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_mime(MIME_DOCX), Some(MediaType::Docx));
        assert_eq!(MediaType::from_mime("application/msword"), None);
        assert_eq!(MediaType::from_extension("DOCX"), Some(MediaType::Docx));
        assert_eq!(MediaType::from_extension("png"), None);
    }

    #[test]
    fn test_unsupported_type_rejected() {
        for mime in ["image/png", "application/octet-stream", "", "text/html"] {
            let err = extract(b"Hello", mime).unwrap_err();
            assert!(matches!(err, ExtractError::UnsupportedMediaType(ref m) if m == mime));
            assert!(!err.is_extraction_failure());
        }
    }

    #[test]
    fn test_plain_text_passthrough() {
        let out = extract("Hello, wörld.\n\n".as_bytes(), "text/plain").unwrap();
        assert_eq!(out.text, "Hello, wörld.");
        assert_eq!(out.char_count(), 13);
    }

    #[test]
    fn test_invalid_pdf_is_extraction_failure() {
        let err = extract(b"not a pdf", MIME_PDF).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
        assert!(err.is_extraction_failure());
    }

    #[test]
    fn test_invalid_zip_is_extraction_failure() {
        let err = extract(b"not a zip", MIME_DOCX).unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
        assert!(err.is_extraction_failure());
    }

    #[test]
    fn test_pdf_pages_in_order() {
        let bytes = pdf_with_pages(&["First page", "Second page"]);
        let out = extract(&bytes, MIME_PDF).unwrap();
        assert_eq!(out.text, "First page\n\nSecond page");
    }

    #[test]
    fn test_mime_matches_resolution() {
        for kind in [MediaType::PlainText, MediaType::Pdf, MediaType::Docx] {
            assert_eq!(MediaType::from_mime(kind.mime()), Some(kind));
        }
    }

    #[test]
    fn test_docx_line_breaks() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>Line one</w:t><w:br/><w:t>Line two</w:t></w:r></w:p><w:p><w:r><w:t>Next</w:t></w:r></w:p>"#,
        );
        let out = extract(&bytes, MIME_DOCX).unwrap();
        assert_eq!(out.text, "Line one\nLine two\nNext");
    }

    #[test]
    fn test_docx_paragraphs() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>First </w:t></w:r><w:r><w:t>paragraph &amp; more</w:t></w:r></w:p><w:p><w:r><w:t>Second</w:t><w:tab/><w:t>tabbed</w:t></w:r></w:p>"#,
        );
        let out = extract(&bytes, MIME_DOCX).unwrap();
        assert_eq!(out.text, "First paragraph & more\nSecond\ttabbed");
    }

    #[test]
    fn test_docx_without_body_part() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/styles.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<w:styles/>").unwrap();
            writer.finish().unwrap();
        }
        let err = extract(&cursor.into_inner(), MIME_DOCX).unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }

    #[test]
    fn test_extract_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Plain notes").unwrap();
        assert_eq!(extract_file(&path).unwrap().text, "Plain notes");

        let image = dir.path().join("photo.png");
        std::fs::write(&image, [0u8; 4]).unwrap();
        assert!(matches!(
            extract_file(&image),
            Err(ExtractError::UnsupportedMediaType(_))
        ));
    }
}
