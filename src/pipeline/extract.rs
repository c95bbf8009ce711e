//! Text extraction from the source document.
//!
//! ## Why spawn_blocking?
//!
//! Parsing a PDF object graph and decoding its content streams is CPU-bound.
//! `tokio::task::spawn_blocking` moves the work onto the blocking thread pool
//! so the async worker threads keep servicing I/O while a large document is
//! being decoded.
//!
//! ## Extraction contract
//!
//! Pages are extracted in ascending page order. Each page's text is trimmed
//! of trailing whitespace (content streams routinely end with a dangling
//! newline) and pages are joined with a blank line, giving one deterministic
//! string per document regardless of how the producer chunked its streams.

use crate::error::TranslateError;
use crate::output::DocumentMetadata;
use lopdf::{Dictionary, Document, Object};
use std::path::Path;
use tracing::{debug, info};

/// Extract the plain text of every page, in document order.
pub async fn extract_text(pdf_path: &Path) -> Result<String, TranslateError> {
    let path = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || extract_text_blocking(&path))
        .await
        .map_err(|e| TranslateError::Internal(format!("extract task panicked: {e}")))?
}

/// Blocking implementation of text extraction.
fn extract_text_blocking(path: &Path) -> Result<String, TranslateError> {
    let doc = load_document(path)?;

    let page_ids = doc.get_pages();
    info!("PDF loaded: {} pages", page_ids.len());

    let mut pages: Vec<String> = Vec::with_capacity(page_ids.len());
    for (page_num, _page_id) in page_ids {
        let text = doc
            .extract_text(&[page_num])
            .map_err(|e| TranslateError::Parse {
                path: path.to_path_buf(),
                detail: format!("text extraction failed on page {page_num}: {e}"),
            })?;
        debug!("Extracted page {} ({} chars)", page_num, text.len());
        pages.push(text.trim_end().to_string());
    }

    Ok(pages.join("\n\n"))
}

/// Read document metadata without extracting page content.
pub async fn read_metadata(pdf_path: &Path) -> Result<DocumentMetadata, TranslateError> {
    let path = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || read_metadata_blocking(&path))
        .await
        .map_err(|e| TranslateError::Internal(format!("metadata task panicked: {e}")))?
}

/// Blocking implementation of metadata reading.
fn read_metadata_blocking(path: &Path) -> Result<DocumentMetadata, TranslateError> {
    let doc = load_document(path)?;

    let mut meta = DocumentMetadata {
        page_count: doc.get_pages().len(),
        pdf_version: doc.version.to_string(),
        encrypted: doc.is_encrypted(),
        ..Default::default()
    };

    if let Some(info) = resolve_info_dict(&doc) {
        meta.title = get_string(info, b"Title");
        meta.author = get_string(info, b"Author");
        meta.subject = get_string(info, b"Subject");
        meta.creator = get_string(info, b"Creator");
        meta.producer = get_string(info, b"Producer");
        meta.creation_date = get_string(info, b"CreationDate");
        meta.modification_date = get_string(info, b"ModDate");
    }

    Ok(meta)
}

/// Load a document, distinguishing unreadable files from undecodable ones.
///
/// Reading the bytes first keeps the error taxonomy clean: filesystem
/// problems surface as `Io`, structural problems as `Parse`.
fn load_document(path: &Path) -> Result<Document, TranslateError> {
    let bytes = std::fs::read(path).map_err(|e| TranslateError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Document::load_mem(&bytes).map_err(|e| TranslateError::Parse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// The trailer `Info` entry may be a reference or an inline dictionary.
fn resolve_info_dict(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    match info {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when BOM-prefixed, Latin-1 otherwise.
fn get_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => {
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let utf16: Vec<u16> = bytes[2..]
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16(&utf16).ok()
            } else {
                Some(
                    String::from_utf8(bytes.clone())
                        .unwrap_or_else(|_| bytes.iter().map(|&b| b as char).collect()),
                )
            }
        }
        _ => None,
    }
    .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::StringFormat;

    #[test]
    fn missing_file_is_io_error() {
        let err = extract_text_blocking(Path::new("/no/such/file.pdf")).unwrap_err();
        assert!(matches!(err, TranslateError::Io { .. }), "got: {err}");
    }

    #[test]
    fn garbage_bytes_are_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.pdf");
        std::fs::write(&path, b"%PDF-1.5 but nothing else").unwrap();

        let err = extract_text_blocking(&path).unwrap_err();
        assert!(matches!(err, TranslateError::Parse { .. }), "got: {err}");
    }

    #[test]
    fn decodes_plain_strings() {
        let mut dict = Dictionary::new();
        dict.set(
            "Title",
            Object::String(b"Annual Report".to_vec(), StringFormat::Literal),
        );
        assert_eq!(get_string(&dict, b"Title").as_deref(), Some("Annual Report"));
    }

    #[test]
    fn decodes_utf16_strings() {
        // "Caf<e-acute>" as UTF-16BE with BOM
        let bytes = vec![0xFE, 0xFF, 0x00, b'C', 0x00, b'a', 0x00, b'f', 0x00, 0xE9];
        let mut dict = Dictionary::new();
        dict.set("Title", Object::String(bytes, StringFormat::Literal));
        assert_eq!(get_string(&dict, b"Title").as_deref(), Some("Café"));
    }

    #[test]
    fn empty_strings_become_none() {
        let mut dict = Dictionary::new();
        dict.set("Author", Object::String(Vec::new(), StringFormat::Literal));
        assert_eq!(get_string(&dict, b"Author"), None);
    }
}
