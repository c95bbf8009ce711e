//! Machine translation over a remote HTTP endpoint.
//!
//! ## Why a trait seam?
//!
//! The pipeline needs exactly one capability: text in, translated text out.
//! Putting that behind [`Translator`] keeps the driver ignorant of transport
//! details and lets tests inject deterministic stubs through
//! [`crate::config::TranslationConfigBuilder::translator`] instead of
//! standing up a network.
//!
//! The default implementation, [`HttpTranslator`], talks to the public
//! `translate_a/single` endpoint: one request per run carrying the full
//! text, no chunking, no retries. Failures are logged here and returned to
//! the caller as-is.

use crate::error::TranslateError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

/// Endpoint base used when the config does not override it.
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// A text translation backend.
///
/// Implementations must be `Send + Sync`; the config stores them as
/// `Arc<dyn Translator>`.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into the language named by `target_lang`.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError>;

    /// Short backend name for log lines.
    fn name(&self) -> &str {
        "custom"
    }
}

/// Translator backed by the public web translation endpoint.
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranslator {
    /// Build a client with the given request timeout and optional endpoint
    /// override.
    pub fn new(timeout_secs: u64, endpoint: Option<&str>) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TranslateError::Internal(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.unwrap_or(DEFAULT_ENDPOINT).to_string(),
        })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslateError> {
        info!(
            "Translating {} chars to '{}' via {}",
            text.chars().count(),
            target_lang,
            self.endpoint
        );

        // The text rides in the form body; query-string transport would hit
        // URL length limits on multi-page documents.
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await
            .map_err(|e| {
                error!("Translation request failed: {e}");
                TranslateError::Network { source: e }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .map(|body| truncate(&body, 200))
                .unwrap_or_else(|_| "<no body>".into());
            error!("Translation service returned HTTP {status}: {detail}");
            return Err(TranslateError::Service {
                status: status.as_u16(),
                detail,
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            error!("Translation response was not JSON: {e}");
            TranslateError::Service {
                status: status.as_u16(),
                detail: format!("response was not JSON: {e}"),
            }
        })?;

        let translated = concat_segments(&body).ok_or_else(|| {
            error!("Translation response had an unexpected shape");
            TranslateError::Service {
                status: status.as_u16(),
                detail: format!("unexpected response shape: {}", truncate(&body.to_string(), 200)),
            }
        })?;

        debug!("Received {} translated chars", translated.chars().count());
        Ok(translated)
    }

    fn name(&self) -> &str {
        "gtx"
    }
}

/// The endpoint answers with a nested array; element 0 is the segment list
/// and each segment's element 0 is its translated text. Concatenating the
/// segments in order reassembles the full translation.
fn concat_segments(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let mut out = String::new();
    for seg in segments {
        if let Some(piece) = seg.get(0).and_then(Value::as_str) {
            out.push_str(piece);
        }
    }
    if out.is_empty() && !segments.is_empty() {
        return None;
    }
    Some(out)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn concat_segments_joins_in_order() {
        let body = json!([
            [
                ["Hola ", "Hello ", null, null, 10],
                ["mundo", "world", null, null, 10]
            ],
            null,
            "en"
        ]);
        assert_eq!(concat_segments(&body).as_deref(), Some("Hola mundo"));
    }

    #[test]
    fn concat_segments_single_segment() {
        let body = json!([[["Bonjour tout le monde", "Hello everyone", null, null]], null, "en"]);
        assert_eq!(
            concat_segments(&body).as_deref(),
            Some("Bonjour tout le monde")
        );
    }

    #[test]
    fn concat_segments_rejects_wrong_shape() {
        assert!(concat_segments(&json!({"error": "nope"})).is_none());
        assert!(concat_segments(&json!([[["", ""]], null])).is_none());
        assert!(concat_segments(&json!(null)).is_none());
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 10), "héllo");
        assert_eq!(truncate("ééééé", 3), "ééé…");
    }

    #[test]
    fn http_translator_reports_name() {
        let t = HttpTranslator::new(30, None).unwrap();
        assert_eq!(t.name(), "gtx");
        assert_eq!(t.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn http_translator_honours_endpoint_override() {
        let t = HttpTranslator::new(30, Some("http://localhost:9999/translate")).unwrap();
        assert_eq!(t.endpoint, "http://localhost:9999/translate");
    }
}
