//! # pdftrans
//!
//! Translate PDF documents with a remote machine-translation service.
//!
//! ## Why this crate?
//!
//! Translation tools that rebuild the document from extracted text throw
//! the layout away — figures, tables, and formatting are gone. Instead
//! this crate keeps the source document's object graph untouched and
//! overlays the translated text onto the first page of a copy, so every
//! page, image, and annotation of the original survives in the output.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      resolve local file or download from URL
//!  ├─ 2. Extract    pull the text layer via lopdf (CPU-bound, spawn_blocking)
//!  ├─ 3. Clean      deterministic cleanup of extractor artefacts
//!  ├─ 4. Translate  one call to the translation service (network I/O)
//!  ├─ 5. Overlay    embed the font, draw the translated text onto page 1
//!  └─ 6. Output     original document + overlay, written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdftrans::{translate, TranslationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TranslationConfig::builder()
//!         .input("document.pdf")
//!         .output_path("document_translated.pdf")
//!         .font_path("NotoSans-Regular.ttf")
//!         .target_lang("es")
//!         .build()?;
//!     let output = translate(&config).await?;
//!     println!("{}", output.translated_text);
//!     eprintln!(
//!         "{} pages, {}ms",
//!         output.stats.page_count, output.stats.total_duration_ms
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdftrans` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdftrans = { version = "0.3", default-features = false }
//! ```
//!
//! ## Fonts
//!
//! The overlay embeds a TrueType font you supply as a simple
//! `WinAnsiEncoding` font, which covers Latin-script target languages.
//! Any font with good Latin coverage works; DejaVu Sans and Noto Sans are
//! safe choices. Characters the encoding cannot express are drawn as `?`.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod translate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{TranslationConfig, TranslationConfigBuilder};
pub use error::TranslateError;
pub use output::{DocumentMetadata, TranslationOutput, TranslationStats};
pub use pipeline::translate::{HttpTranslator, Translator};
pub use progress::{
    NoopProgressCallback, ProgressCallback, TranslationProgressCallback, TranslationStage,
};
pub use translate::{extract, inspect, translate, translate_sync};
