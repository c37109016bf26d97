//! Text extraction from uploaded resume files (PDF via `pdf-extract`, DOCX via
//! the `word/document.xml` part of the zip container).

use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ExtractionFailure;

const DOCX_BODY_PART: &str = "word/document.xml";

/// The resume formats the screener can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Docx,
}

impl DocumentType {
    /// Infers the type from a filename extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionFailure> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        extension.parse()
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Docx => "docx",
        }
    }
}

impl FromStr for DocumentType {
    type Err = ExtractionFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentType::Pdf),
            "docx" => Ok(DocumentType::Docx),
            _ => Err(ExtractionFailure::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Extracts raw text from a file on disk.
///
/// Library failures (including panics inside the PDF parser on malformed
/// input) come back as `ExtractionFailure::Extraction`.
pub fn extract_text(path: &Path, doc_type: DocumentType) -> Result<String, ExtractionFailure> {
    match doc_type {
        DocumentType::Pdf => extract_pdf(path),
        DocumentType::Docx => extract_docx(path),
    }
}

/// Writes an upload to a named temp file carrying the original extension,
/// extracts its text, and removes the file again.
pub fn extract_upload(filename: &str, content: &[u8]) -> Result<String, ExtractionFailure> {
    extract_upload_in(&std::env::temp_dir(), filename, content)
}

/// `extract_upload` with an explicit directory for the temp file. The file is
/// deleted when it goes out of scope, including on the error paths.
pub fn extract_upload_in(
    temp_dir: &Path,
    filename: &str,
    content: &[u8],
) -> Result<String, ExtractionFailure> {
    let doc_type = DocumentType::from_filename(filename)?;

    let mut temp = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(&format!(".{}", doc_type.extension()))
        .tempfile_in(temp_dir)
        .map_err(|e| ExtractionFailure::Extraction(format!("could not create temp file: {e}")))?;
    temp.write_all(content)
        .and_then(|_| temp.flush())
        .map_err(|e| ExtractionFailure::Extraction(format!("could not write temp file: {e}")))?;

    debug!(
        "Extracting {} ({} bytes) via {}",
        filename,
        content.len(),
        temp.path().display()
    );
    extract_text(temp.path(), doc_type)
}

fn extract_pdf(path: &Path) -> Result<String, ExtractionFailure> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));
    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractionFailure::Extraction(format!("unreadable PDF: {e}"))),
        Err(_) => Err(ExtractionFailure::Extraction(
            "PDF parser aborted on malformed input".to_string(),
        )),
    }
}

fn extract_docx(path: &Path) -> Result<String, ExtractionFailure> {
    let file = File::open(path)
        .map_err(|e| ExtractionFailure::Extraction(format!("could not open DOCX: {e}")))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| ExtractionFailure::Extraction(format!("not a DOCX container: {e}")))?;
    let mut part = archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| ExtractionFailure::Extraction(format!("missing {DOCX_BODY_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractionFailure::Extraction(format!("unreadable {DOCX_BODY_PART}: {e}")))?;

    docx_xml_to_text(&xml)
        .map_err(|e| ExtractionFailure::Extraction(format!("malformed {DOCX_BODY_PART}: {e}")))
}

/// Flattens WordprocessingML into plain text: the runs of each `<w:p>` are
/// concatenated and paragraphs are joined by a single space.
pub fn docx_xml_to_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join(" "))
}
