//! Pipeline stages for PDF translation.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. inject a different translation backend)
//! without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ clean ──▶ translate ──▶ overlay
//! (URL/path)  (lopdf)   (rules)   (gtx API)     (lopdf + font)
//! ```
//!
//! 1. [`input`]     — canonicalise the user-supplied path or URL to a local
//!    file
//! 2. [`extract`]   — pull the text layer out page by page; runs in
//!    `spawn_blocking` because document parsing is CPU-bound
//! 3. [`clean`]     — deterministic cleanup rules for extractor artefacts
//!    (stray control characters, zero-width marks, collapsed blank runs)
//! 4. [`translate`] — send the text to the translation service; the only
//!    stage with network I/O
//! 5. [`overlay`]   — embed the configured font ([`font`]) and draw the
//!    translated text onto the first page of a copy of the source document
//!
//! Extraction and overlay both read the source file independently; the
//! overlay works on the original object graph, so the output keeps every
//! page, annotation, and metadata entry of the input.

pub mod clean;
pub mod extract;
pub mod font;
pub mod input;
pub mod overlay;
pub mod translate;
