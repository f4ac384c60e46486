//! Content intake: turning uploaded files into plain study text
//!
//! Supported: `.txt` and `.md` (UTF-8), `.docx` (text of
//! `word/document.xml`). Legacy binary `.doc` is rejected.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;

/// Recognized upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Plain UTF-8 text
    PlainText,
    /// Markdown, read as plain text
    Markdown,
    /// Office Open XML word-processing document
    Docx,
}

impl SourceFormat {
    /// Resolve the format from a file name's extension
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" => Ok(Self::PlainText),
            "md" | "markdown" => Ok(Self::Markdown),
            "docx" => Ok(Self::Docx),
            "" => Err(Error::UnsupportedFileType("(none)".to_string())),
            other => Err(Error::UnsupportedFileType(other.to_string())),
        }
    }
}

/// Read a file from disk and extract its text
pub async fn extract_text(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    // Check the type before touching the file so .doc fails fast
    SourceFormat::from_file_name(name)?;

    let bytes = tokio::fs::read(path).await?;
    extract_text_from_bytes(name, &bytes)
}

/// Extract text from an uploaded file's bytes
pub fn extract_text_from_bytes(file_name: &str, bytes: &[u8]) -> Result<String> {
    let format = SourceFormat::from_file_name(file_name)?;
    let text = match format {
        SourceFormat::PlainText | SourceFormat::Markdown => String::from_utf8(bytes.to_vec())
            .map_err(|_| Error::Document(format!("{} is not valid UTF-8 text", file_name)))?,
        SourceFormat::Docx => docx_text(bytes)?,
    };

    tracing::debug!(file = file_name, ?format, chars = text.chars().count(), "Extracted upload text");
    Ok(text)
}

/// Pull paragraph text out of a `.docx` container
fn docx_text(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::Document(format!("Not a valid .docx archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| Error::Document(format!("Missing document body: {}", e)))?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| Error::Document(format!("Bad text run: {}", e)))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::Document(format!(
                    "Malformed document XML at {}: {}",
                    reader.error_position(),
                    e
                )))
            }
        }
    }

    Ok(out.trim_end().to_string())
}
