//! Error types for the pdftrans library.
//!
//! The pipeline is all-or-nothing: one document in, one document out, no
//! partial results. A single closed enum, [`TranslateError`], therefore
//! covers every failure the library returns, one variant per failure class
//! (I/O, document structure, download, network transport, service response,
//! rendering, input size, configuration).
//!
//! Callers that want to retry can consult [`TranslateError::is_retryable`]:
//! network and service-side conditions are transient, everything else is
//! final.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdftrans library.
#[derive(Debug, Error)]
pub enum TranslateError {
    // ── Filesystem errors ─────────────────────────────────────────────────
    /// A file could not be read or written.
    #[error("I/O error on '{path}': {source}\nCheck the path exists and is readable.")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Document errors ───────────────────────────────────────────────────
    /// The file was read but its PDF structure cannot be decoded.
    #[error("Cannot parse PDF '{path}': {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    Parse { path: PathBuf, detail: String },

    // ── Network errors ────────────────────────────────────────────────────
    /// HTTP URL input was syntactically valid but the download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    Download { url: String, reason: String },

    /// The translation request never produced a response (DNS, connect,
    /// timeout, TLS).
    #[error("Translation request failed: {source}\nThis is usually transient; check your internet connection.")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    /// The translation service answered, but with a non-success status or a
    /// body that could not be interpreted.
    #[error("Translation service error (HTTP {status}): {detail}")]
    Service { status: u16, detail: String },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// The output document could not be produced: the source document model
    /// failed to load for editing, or the font resource is missing,
    /// unparseable, or could not be embedded.
    #[error("Rendering failed: {detail}")]
    Render { detail: String },

    // ── Guard rails ───────────────────────────────────────────────────────
    /// Extracted text exceeds the configured single-request limit.
    ///
    /// The service accepts one request per run with no chunking, so
    /// oversized inputs are rejected up front instead of failing remotely.
    #[error("Extracted text is too large to translate in one request: {chars} characters (limit {max}).\nRaise the limit with max_input_chars() or split the document.")]
    InputTooLarge { chars: usize, max: usize },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (panicked worker task, runtime setup).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TranslateError {
    /// Whether retrying the same run may succeed.
    ///
    /// Transport failures and throttling/server-side service errors are
    /// retryable; parse, render, size, and configuration errors are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Download { .. } | Self::Network { .. } => true,
            Self::Service { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_too_large_display() {
        let e = TranslateError::InputTooLarge {
            chars: 80_000,
            max: 50_000,
        };
        let msg = e.to_string();
        assert!(msg.contains("80000"), "got: {msg}");
        assert!(msg.contains("50000"), "got: {msg}");
    }

    #[test]
    fn service_display() {
        let e = TranslateError::Service {
            status: 503,
            detail: "upstream unavailable".into(),
        };
        assert!(e.to_string().contains("503"));
        assert!(e.to_string().contains("upstream unavailable"));
    }

    #[test]
    fn render_display() {
        let e = TranslateError::Render {
            detail: "font file not found: fonts/NotoSans.ttf".into(),
        };
        assert!(e.to_string().contains("fonts/NotoSans.ttf"));
    }

    #[test]
    fn retryable_classification() {
        assert!(TranslateError::Download {
            url: "https://example.com/a.pdf".into(),
            reason: "connection reset".into(),
        }
        .is_retryable());

        assert!(TranslateError::Service {
            status: 429,
            detail: "rate limited".into(),
        }
        .is_retryable());

        assert!(TranslateError::Service {
            status: 500,
            detail: "boom".into(),
        }
        .is_retryable());

        assert!(!TranslateError::Service {
            status: 400,
            detail: "bad request".into(),
        }
        .is_retryable());

        assert!(!TranslateError::Parse {
            path: "a.pdf".into(),
            detail: "bad xref".into(),
        }
        .is_retryable());

        assert!(!TranslateError::Render {
            detail: "no pages".into(),
        }
        .is_retryable());

        assert!(!TranslateError::InputTooLarge {
            chars: 2,
            max: 1,
        }
        .is_retryable());
    }
}
