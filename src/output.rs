//! Output types returned by the translation pipeline.
//!
//! [`TranslationOutput`] is the full result record: both text blobs, the
//! output location, source-document metadata, and run statistics. Everything
//! is `Serialize` so the CLI can emit it as JSON and applications can persist
//! run records without conversion glue.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The result of a successful translation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOutput {
    /// Normalized text extracted from the source document.
    pub extracted_text: String,

    /// The translated text drawn onto the output document.
    pub translated_text: String,

    /// Where the output document was written.
    pub output_path: PathBuf,

    /// Metadata read from the source document.
    pub metadata: DocumentMetadata,

    /// Timing and size statistics for the run.
    pub stats: TranslationStats,
}

/// Statistics describing one translation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationStats {
    /// Pages in the source document.
    pub page_count: usize,

    /// Characters of extracted (normalized) text.
    pub extracted_chars: usize,

    /// Characters of translated text.
    pub translated_chars: usize,

    /// Language code the text was translated into.
    pub target_lang: String,

    /// Wall-clock duration of the whole run.
    pub total_duration_ms: u64,

    /// Time spent extracting text.
    pub extract_duration_ms: u64,

    /// Time spent in the translation call.
    pub translate_duration_ms: u64,

    /// Time spent embedding the font and writing the output.
    pub render_duration_ms: u64,
}

/// Document metadata read from the source PDF.
///
/// Populated from the trailer `Info` dictionary where present; absent
/// entries stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    /// Raw PDF date string, e.g. "D:20240115093000Z".
    pub creation_date: Option<String>,
    /// Raw PDF date string of the last modification.
    pub modification_date: Option<String>,
    /// Number of pages in the document.
    pub page_count: usize,
    /// PDF version from the file header, e.g. "1.7".
    pub pdf_version: String,
    /// Whether the document declares encryption.
    pub encrypted: bool,
}
