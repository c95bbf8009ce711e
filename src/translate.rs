//! Whole-document translation entry points.
//!
//! ## Why a single eager driver?
//!
//! A translated PDF is all-or-nothing: the output file only makes sense
//! once the source text has been extracted, translated, and drawn. So the
//! driver runs the pipeline stages strictly in order, keeps the
//! intermediate text in memory, and writes the output file as the very
//! last step. A failure at any stage returns early and leaves no partial
//! output behind.

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::output::{DocumentMetadata, TranslationOutput, TranslationStats};
use crate::pipeline::translate::{HttpTranslator, Translator};
use crate::pipeline::{clean, extract, input, overlay};
use crate::progress::TranslationStage;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Translate a PDF file or URL and write the result to
/// `config.output_path`.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `config` — Translation configuration; build one with
///   [`TranslationConfig::builder`]
///
/// # Returns
/// `Ok(TranslationOutput)` with both intermediate texts, document
/// metadata, and timing stats.
///
/// # Errors
/// Returns `Err(TranslateError)` and writes nothing when any stage fails:
/// - File not found / not a valid PDF
/// - Translation service unreachable or refusing the request
/// - Font file missing or unusable
pub async fn translate(config: &TranslationConfig) -> Result<TranslationOutput, TranslateError> {
    let total_start = Instant::now();
    info!(
        "Starting translation: {} -> {} ({})",
        config.input,
        config.output_path.display(),
        config.target_lang
    );

    // ── Step 1: Resolve input ────────────────────────────────────────────
    if let Some(ref cb) = config.progress {
        cb.on_stage_start(TranslationStage::Resolve, &config.input);
    }
    let resolved = input::resolve_input(&config.input, config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();
    if let Some(ref cb) = config.progress {
        cb.on_stage_complete(TranslationStage::Resolve);
    }

    // ── Step 2: Read metadata ────────────────────────────────────────────
    let metadata = extract::read_metadata(&pdf_path).await?;
    info!("PDF has {} pages", metadata.page_count);

    // ── Step 3: Extract text ─────────────────────────────────────────────
    if let Some(ref cb) = config.progress {
        cb.on_stage_start(TranslationStage::Extract, &pdf_path.to_string_lossy());
    }
    let extract_start = Instant::now();
    let raw_text = extract::extract_text(&pdf_path).await?;
    let extracted_text = clean::clean_text(&raw_text);
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    let extracted_chars = extracted_text.chars().count();
    info!(
        "Extracted {} characters in {}ms",
        extracted_chars, extract_duration_ms
    );
    debug!("Extracted text:\n{}", extracted_text);
    if let Some(ref cb) = config.progress {
        cb.on_stage_complete(TranslationStage::Extract);
    }

    // ── Step 4: Enforce the input size cap ───────────────────────────────
    if extracted_chars > config.max_input_chars {
        return Err(TranslateError::InputTooLarge {
            chars: extracted_chars,
            max: config.max_input_chars,
        });
    }

    // ── Step 5: Translate ────────────────────────────────────────────────
    let translator = resolve_translator(config)?;
    if let Some(ref cb) = config.progress {
        cb.on_stage_start(TranslationStage::Translate, translator.name());
    }
    let translate_start = Instant::now();
    let translated_text = translator
        .translate(&extracted_text, &config.target_lang)
        .await?;
    let translate_duration_ms = translate_start.elapsed().as_millis() as u64;

    let translated_chars = translated_text.chars().count();
    info!(
        "Translated to {} characters in {}ms",
        translated_chars, translate_duration_ms
    );
    debug!("Translated text:\n{}", translated_text);
    if let Some(ref cb) = config.progress {
        cb.on_stage_complete(TranslationStage::Translate);
    }

    // ── Step 6: Render the output document ───────────────────────────────
    if let Some(ref cb) = config.progress {
        cb.on_stage_start(
            TranslationStage::Render,
            &config.output_path.to_string_lossy(),
        );
    }
    let render_start = Instant::now();
    overlay::render_overlay(
        &pdf_path,
        &translated_text,
        &config.output_path,
        &config.font_path,
    )
    .await?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    if let Some(ref cb) = config.progress {
        cb.on_stage_complete(TranslationStage::Render);
    }

    // ── Step 7: Compute stats ────────────────────────────────────────────
    let stats = TranslationStats {
        page_count: metadata.page_count,
        extracted_chars,
        translated_chars,
        target_lang: config.target_lang.clone(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        extract_duration_ms,
        translate_duration_ms,
        render_duration_ms,
    };

    info!(
        "Translation complete: {} written in {}ms",
        config.output_path.display(),
        stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress {
        cb.on_run_complete(stats.total_duration_ms);
    }

    Ok(TranslationOutput {
        extracted_text,
        translated_text,
        output_path: config.output_path.clone(),
        metadata,
        stats,
    })
}

/// Synchronous wrapper around [`translate`].
///
/// Creates a temporary tokio runtime internally.
pub fn translate_sync(config: &TranslationConfig) -> Result<TranslationOutput, TranslateError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| TranslateError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(translate(config))
}

/// Read document metadata without translating anything.
///
/// Does not touch the network beyond a possible input download.
pub async fn inspect(input_str: impl AsRef<str>) -> Result<DocumentMetadata, TranslateError> {
    let resolved = input::resolve_input(input_str.as_ref(), 120).await?;
    extract::read_metadata(resolved.path()).await
}

/// Extract the text layer of a PDF file or URL without translating it.
///
/// Returns the same cleaned text the translation stage would receive.
pub async fn extract(input_str: impl AsRef<str>) -> Result<String, TranslateError> {
    let resolved = input::resolve_input(input_str.as_ref(), 120).await?;
    let raw = extract::extract_text(resolved.path()).await?;
    Ok(clean::clean_text(&raw))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the translation backend, from most-specific to least-specific.
///
/// 1. **Pre-built translator** (`config.translator`) — the caller
///    constructed the backend entirely; we use it as-is. Useful in tests or
///    when the caller needs custom middleware (caching, rate-limiting).
/// 2. **HTTP backend** — built from `config.endpoint` (or the default
///    service URL) and `config.request_timeout_secs`.
fn resolve_translator(config: &TranslationConfig) -> Result<Arc<dyn Translator>, TranslateError> {
    if let Some(ref translator) = config.translator {
        return Ok(Arc::clone(translator));
    }
    let http = HttpTranslator::new(config.request_timeout_secs, config.endpoint.as_deref())?;
    Ok(Arc::new(http))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedTranslator(&'static str);

    #[async_trait]
    impl Translator for FixedTranslator {
        async fn translate(
            &self,
            _text: &str,
            _target_lang: &str,
        ) -> Result<String, TranslateError> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn injected_translator_wins_over_http() {
        let config = TranslationConfig::builder()
            .input("in.pdf")
            .output_path("out.pdf")
            .font_path("font.ttf")
            .translator(Arc::new(FixedTranslator("hola")))
            .build()
            .unwrap();

        let translator = resolve_translator(&config).unwrap();
        assert_eq!(translator.name(), "fixed");
    }

    #[test]
    fn default_backend_is_http() {
        let config = TranslationConfig::builder()
            .input("in.pdf")
            .output_path("out.pdf")
            .font_path("font.ttf")
            .build()
            .unwrap();

        let translator = resolve_translator(&config).unwrap();
        assert_eq!(translator.name(), "gtx");
    }
}
