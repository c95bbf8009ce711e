//! Normalization of extracted text before translation.
//!
//! ## Why normalize at all?
//!
//! PDF text extraction reflects how the producer chunked its content streams,
//! not how a human reads the page. Common artefacts:
//!
//! - Windows-style `\r\n` (or bare `\r`) line endings
//! - Stray C0 control characters leaking out of ToUnicode maps
//! - Soft hyphens and zero-width characters from hyphenation and kerning
//! - Runs of blank lines where the producer split streams
//!
//! This module applies a short list of cheap, deterministic rules that fix
//! those artefacts without touching content. The pass is idempotent, and for
//! plain single-line text it is the identity, so extraction results stay
//! byte-comparable against known documents.
//!
//! ## Rule order
//!
//! Line endings are normalised first so later line-based rules only ever see
//! `\n`; blank-line collapsing runs last, after trimming may have emptied
//! lines.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all normalization rules to raw extracted text.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF / CR → LF)
/// 2. Strip C0 control characters other than `\n` and `\t`
/// 3. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 4. Trim trailing whitespace per line
/// 5. Collapse 3+ consecutive newlines down to 2
pub fn clean_text(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = strip_control_chars(&s);
    let s = remove_invisible_chars(&s);
    let s = trim_line_ends(&s);
    collapse_blank_lines(&s)
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip control characters ─────────────────────────────────────────

static RE_CONTROL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap());

fn strip_control_chars(input: &str) -> String {
    RE_CONTROL.replace_all(input, "").to_string()
}

// ── Rule 3: Remove invisible Unicode characters ──────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 4: Trim trailing whitespace per line ────────────────────────────────

fn trim_line_ends(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 5: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────
