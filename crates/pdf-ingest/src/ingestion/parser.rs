//! PDF reader: document-info metadata and per-page text

use lopdf::{Dictionary, Document, Object};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{PageData, PdfDocument};

/// Reads a PDF into a [`PdfDocument`]
pub struct PdfReader;

impl PdfReader {
    /// Extract metadata and page text from the PDF at `path`.
    ///
    /// Fails with [`Error::NotFound`] before any parsing when `path` is not an
    /// existing file, and with [`Error::Parse`] when the file cannot be read as a
    /// PDF or a page fails to extract. Nothing partial is returned.
    pub fn parse(path: &Path) -> Result<PdfDocument> {
        ensure_file(path)?;

        let mut document = PdfDocument::default();
        Self::fill_metadata(path, &mut document)?;
        Self::fill_pages(path, &mut document)?;

        tracing::debug!(
            "Parsed {}: {} pages with text, {} chars",
            path.display(),
            document.pages.len(),
            document.char_count()
        );

        Ok(document)
    }

    /// Number of pages in the file, with or without text
    pub fn page_count(path: &Path) -> Result<usize> {
        let pdf = load(path)?;
        Ok(pdf.get_pages().len())
    }

    /// Fill title, author and creation date from the trailer `Info` dictionary
    fn fill_metadata(path: &Path, document: &mut PdfDocument) -> Result<()> {
        ensure_file(path)?;
        let pdf = load(path)?;

        if let Some(info) = info_dictionary(&pdf) {
            document.title = info_field(&pdf, info, b"Title");
            document.author = info_field(&pdf, info, b"Author");
            document.creation_date = info_field(&pdf, info, b"CreationDate");
        }

        Ok(())
    }

    /// Extract each page's text, skipping pages with no extractable text
    fn fill_pages(path: &Path, document: &mut PdfDocument) -> Result<()> {
        ensure_file(path)?;
        let pdf = load(path)?;

        let mut pages = Vec::new();
        for page_number in pdf.get_pages().into_keys() {
            let text = pdf.extract_text(&[page_number]).map_err(|e| {
                Error::parse(path, format!("page {}: {}", page_number, e))
            })?;

            // lopdf numbers pages from 1
            let num = page_number.saturating_sub(1);
            if text.trim().is_empty() {
                tracing::debug!("Page {} has no extractable text, skipping", num);
                continue;
            }
            pages.push(PageData::new(num, text));
        }

        document.pages = pages;
        Ok(())
    }
}

/// Convenience wrapper around [`PdfReader::parse`]
pub fn parse_pdf(path: impl AsRef<Path>) -> Result<PdfDocument> {
    PdfReader::parse(path.as_ref())
}

fn ensure_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::NotFound(path.to_path_buf()))
    }
}

/// Load the PDF through a handle scoped to this call
fn load(path: &Path) -> Result<Document> {
    let file = File::open(path)
        .map_err(|e| Error::parse(path, format!("cannot open file: {}", e)))?;
    Document::load_from(BufReader::new(file)).map_err(|e| Error::parse(path, e.to_string()))
}

fn resolve<'a>(pdf: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => pdf.get_object(*id).ok(),
        other => Some(other),
    }
}

fn info_dictionary(pdf: &Document) -> Option<&Dictionary> {
    let info = pdf.trailer.get(b"Info").ok()?;
    resolve(pdf, info)?.as_dict().ok()
}

/// Read a text field, defaulting to an empty string, trimmed
fn info_field(pdf: &Document, info: &Dictionary, key: &[u8]) -> String {
    info.get(key)
        .ok()
        .and_then(|value| resolve(pdf, value))
        .and_then(|value| value.as_str().ok())
        .map(decode_text_string)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Decode a PDF text string: UTF-16BE or UTF-8 with a byte order mark,
/// otherwise UTF-8 when valid and Latin-1 as the last resort.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
