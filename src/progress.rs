//! Progress-callback trait for pipeline stage events.
//!
//! Inject an [`Arc<dyn TranslationProgressCallback>`] via
//! [`crate::config::TranslationConfigBuilder::progress`] to receive an event
//! as each stage of the run starts and finishes.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a WebSocket, a log line, or a terminal
//! spinner — without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync` so the config stays
//! shareable across threads.
//!
//! # Example
//!
//! ```rust
//! use pdftrans::{TranslationProgressCallback, TranslationStage};
//!
//! struct PrintingCallback;
//!
//! impl TranslationProgressCallback for PrintingCallback {
//!     fn on_stage_start(&self, stage: TranslationStage, detail: &str) {
//!         eprintln!("{}: {detail}", stage.label());
//!     }
//! }
//! ```

use std::sync::Arc;

/// The stages of a translation run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationStage {
    /// Resolving the input: local path check or URL download.
    Resolve,
    /// Extracting text from the source document.
    Extract,
    /// Calling the translation service.
    Translate,
    /// Embedding the font and writing the output document.
    Render,
}

impl TranslationStage {
    /// Short human-readable label, e.g. for spinner prefixes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Extract => "extract",
            Self::Translate => "translate",
            Self::Render => "render",
        }
    }
}

/// Called by the pipeline as each stage starts and finishes.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Stages run strictly one at a time, so no internal
/// synchronisation is required beyond `Send + Sync` bounds.
pub trait TranslationProgressCallback: Send + Sync {
    /// Called when a stage begins.
    ///
    /// # Arguments
    /// * `stage`  — which stage is starting
    /// * `detail` — human-readable context (input path, language code, …)
    fn on_stage_start(&self, stage: TranslationStage, detail: &str) {
        let _ = (stage, detail);
    }

    /// Called when a stage finishes successfully.
    fn on_stage_complete(&self, stage: TranslationStage) {
        let _ = stage;
    }

    /// Called once after the whole run succeeds.
    ///
    /// # Arguments
    /// * `elapsed_ms` — wall-clock duration of the run
    fn on_run_complete(&self, elapsed_ms: u64) {
        let _ = elapsed_ms;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl TranslationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in
/// [`crate::config::TranslationConfig`].
pub type ProgressCallback = Arc<dyn TranslationProgressCallback>;
