//! Configuration types for PDF translation runs.
//!
//! All run behaviour is controlled through [`TranslationConfig`], built via
//! its [`TranslationConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across threads, log them, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest; `build()` rejects configurations that would fail
//! later anyway (empty paths, malformed language codes).

use crate::error::TranslateError;
use crate::pipeline::translate::Translator;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default translation target when none is configured.
pub const DEFAULT_TARGET_LANG: &str = "en";

/// Default cap on extracted-text size, in characters.
///
/// The whole text goes to the service as a single request, so the cap bounds
/// request size. 50 000 characters sits comfortably under public endpoints'
/// request limits while covering multi-page documents.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 50_000;

/// Configuration for one PDF translation run.
///
/// Built via [`TranslationConfig::builder()`].
///
/// # Example
/// ```rust,no_run
/// use pdftrans::TranslationConfig;
///
/// let config = TranslationConfig::builder()
///     .input("report.pdf")
///     .output_path("report_translated.pdf")
///     .font_path("fonts/NotoSans-Regular.ttf")
///     .target_lang("es")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct TranslationConfig {
    /// Input document: a local path or an `http(s)://` URL.
    pub input: String,

    /// Where the translated document is written. Created or overwritten.
    pub output_path: PathBuf,

    /// TrueType font file embedded into the output. Required because the
    /// target language's glyphs may fall outside the coverage of whatever
    /// fonts the source document carries.
    pub font_path: PathBuf,

    /// Target language code (e.g. "es", "fr", "pt-BR"). Default: "en".
    pub target_lang: String,

    /// Maximum extracted-text size accepted for translation, in characters.
    /// Default: [`DEFAULT_MAX_INPUT_CHARS`]. Oversized inputs are rejected
    /// before any network call with
    /// [`TranslateError::InputTooLarge`](crate::TranslateError::InputTooLarge).
    pub max_input_chars: usize,

    /// Per-request timeout for the translation call in seconds. Default: 30.
    pub request_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Override the translation endpoint base URL. Default: the public
    /// endpoint. Tests point this at a local server.
    pub endpoint: Option<String>,

    /// Pre-constructed translator. Takes precedence over the HTTP default;
    /// tests inject deterministic stubs here.
    pub translator: Option<Arc<dyn Translator>>,

    /// Observer for stage progress events. None disables reporting.
    pub progress: Option<ProgressCallback>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            input: String::new(),
            output_path: PathBuf::new(),
            font_path: PathBuf::new(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            request_timeout_secs: 30,
            download_timeout_secs: 120,
            endpoint: None,
            translator: None,
            progress: None,
        }
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("input", &self.input)
            .field("output_path", &self.output_path)
            .field("font_path", &self.font_path)
            .field("target_lang", &self.target_lang)
            .field("max_input_chars", &self.max_input_chars)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("endpoint", &self.endpoint)
            .field(
                "translator",
                &self.translator.as_ref().map(|_| "<dyn Translator>"),
            )
            .finish()
    }
}

impl TranslationConfig {
    /// Create a new builder for `TranslationConfig`.
    pub fn builder() -> TranslationConfigBuilder {
        TranslationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`TranslationConfig`].
#[derive(Debug)]
pub struct TranslationConfigBuilder {
    config: TranslationConfig,
}

impl TranslationConfigBuilder {
    /// Input document: local path or `http(s)://` URL. Required.
    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.config.input = input.into();
        self
    }

    /// Output path for the translated document. Required.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// TrueType font file to embed. Required.
    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = path.into();
        self
    }

    /// Target language code. Default: "en".
    pub fn target_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.target_lang = lang.into();
        self
    }

    /// Cap on extracted-text size in characters. Clamped to ≥ 1 000.
    pub fn max_input_chars(mut self, n: usize) -> Self {
        self.config.max_input_chars = n.max(1_000);
        self
    }

    /// Per-request translation timeout in seconds. Clamped to ≥ 1.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs.max(1);
        self
    }

    /// Download timeout for URL inputs in seconds. Clamped to ≥ 1.
    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs.max(1);
        self
    }

    /// Override the translation endpoint base URL.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = Some(url.into());
        self
    }

    /// Inject a pre-constructed translator (stubs in tests, alternative
    /// backends in applications).
    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.config.translator = Some(translator);
        self
    }

    /// Receive stage progress events.
    pub fn progress(mut self, callback: ProgressCallback) -> Self {
        self.config.progress = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranslationConfig, TranslateError> {
        let c = &self.config;
        if c.input.is_empty() {
            return Err(TranslateError::InvalidConfig(
                "input path or URL must be set".into(),
            ));
        }
        if c.output_path.as_os_str().is_empty() {
            return Err(TranslateError::InvalidConfig(
                "output path must be set".into(),
            ));
        }
        if c.font_path.as_os_str().is_empty() {
            return Err(TranslateError::InvalidConfig(
                "font path must be set".into(),
            ));
        }
        validate_lang_code(&c.target_lang)?;
        Ok(self.config)
    }
}

/// Accept codes like "en", "es", "pt-BR", "zh-CN": ASCII alphanumerics and
/// hyphens, 2–16 chars, no leading/trailing/double hyphen.
fn validate_lang_code(code: &str) -> Result<(), TranslateError> {
    let well_formed = (2..=16).contains(&code.len())
        && code
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        && !code.starts_with('-')
        && !code.ends_with('-')
        && !code.contains("--");
    if well_formed {
        Ok(())
    } else {
        Err(TranslateError::InvalidConfig(format!(
            "target language '{code}' is not a valid language code"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> TranslationConfigBuilder {
        TranslationConfig::builder()
            .input("in.pdf")
            .output_path("out.pdf")
            .font_path("font.ttf")
    }

    #[test]
    fn builder_defaults() {
        let c = minimal().build().unwrap();
        assert_eq!(c.target_lang, "en");
        assert_eq!(c.max_input_chars, DEFAULT_MAX_INPUT_CHARS);
        assert_eq!(c.request_timeout_secs, 30);
        assert!(c.translator.is_none());
        assert!(c.endpoint.is_none());
    }

    #[test]
    fn missing_input_rejected() {
        let err = TranslationConfig::builder()
            .output_path("out.pdf")
            .font_path("font.ttf")
            .build()
            .unwrap_err();
        assert!(matches!(err, TranslateError::InvalidConfig(_)));
    }

    #[test]
    fn missing_font_rejected() {
        let err = TranslationConfig::builder()
            .input("in.pdf")
            .output_path("out.pdf")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("font"));
    }

    #[test]
    fn lang_codes_validated() {
        for good in ["en", "es", "pt-BR", "zh-CN", "de"] {
            assert!(minimal().target_lang(good).build().is_ok(), "{good}");
        }
        for bad in ["", "e", "-es", "es-", "a--b", "español", "en_US"] {
            assert!(minimal().target_lang(bad).build().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn max_input_chars_clamped() {
        let c = minimal().max_input_chars(10).build().unwrap();
        assert_eq!(c.max_input_chars, 1_000);
    }

    #[test]
    fn timeouts_clamped() {
        let c = minimal()
            .request_timeout_secs(0)
            .download_timeout_secs(0)
            .build()
            .unwrap();
        assert_eq!(c.request_timeout_secs, 1);
        assert_eq!(c.download_timeout_secs, 1);
    }
}
