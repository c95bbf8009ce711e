//! Font loading: TrueType metrics for embedding and measurement.
//!
//! ## Why extract metrics up front?
//!
//! `ttf_parser::Face` borrows the font bytes, which would thread a lifetime
//! through the whole renderer. Instead the face is parsed once at load time
//! and everything the pipeline needs — PostScript name, vertical metrics,
//! bounding box, and per-code advance widths over the WinAnsi range — is
//! copied into an owned [`EmbeddedFont`]. The raw bytes are kept alongside
//! for the `FontFile2` stream.
//!
//! ## Why WinAnsi?
//!
//! The embedded font is registered as a simple font with `WinAnsiEncoding`
//! (the CP-1252 layout): one byte per glyph, 224 width entries, no CMap.
//! That covers Latin-script target languages; characters outside the
//! encoding are substituted with `?` at draw time.

use crate::error::TranslateError;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// First character code covered by the width table.
pub const FIRST_CHAR: u8 = 32;
/// Last character code covered by the width table.
pub const LAST_CHAR: u8 = 255;

const WIDTH_SLOTS: usize = (LAST_CHAR as usize - FIRST_CHAR as usize) + 1;

/// A TrueType font parsed for embedding.
///
/// Vertical metrics and widths are kept in raw font units; accessors scale
/// them to the 1000-unit glyph space PDF font descriptors use.
pub struct EmbeddedFont {
    data: Vec<u8>,
    postscript_name: String,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    cap_height: i16,
    bbox: [i16; 4],
    widths: [u16; WIDTH_SLOTS],
}

impl EmbeddedFont {
    /// Load and parse a font file.
    ///
    /// Any failure here — missing file, unreadable file, bytes that are not
    /// a usable TrueType font — is a rendering error: the font resource
    /// contract belongs to the renderer, not general I/O.
    pub fn load(path: &Path) -> Result<Self, TranslateError> {
        let data = std::fs::read(path).map_err(|e| TranslateError::Render {
            detail: format!("font file '{}' unreadable: {e}", path.display()),
        })?;
        Self::from_bytes(data).map_err(|e| match e {
            TranslateError::Render { detail } => TranslateError::Render {
                detail: format!("font file '{}': {detail}", path.display()),
            },
            other => other,
        })
    }

    /// Parse font bytes already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, TranslateError> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| TranslateError::Render {
            detail: format!("not a usable TrueType font: {e}"),
        })?;

        // A name id can appear once per platform, and only Unicode/Windows
        // records decode; take the first record that actually yields a string.
        let postscript_name = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .find_map(|n| n.to_string())
            .or_else(|| {
                // Fall back to the full name with spaces stripped, as some
                // fonts ship without a PostScript name record.
                face.names()
                    .into_iter()
                    .filter(|n| n.name_id == ttf_parser::name_id::FULL_NAME)
                    .find_map(|n| n.to_string())
                    .map(|n| n.replace(' ', ""))
            })
            .unwrap_or_else(|| "EmbeddedFont".to_string());

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(TranslateError::Render {
                detail: "font declares zero units per em".into(),
            });
        }

        let ascent = face.ascender();
        let descent = face.descender();
        let cap_height = face.capital_height().unwrap_or(ascent);
        let gb = face.global_bounding_box();
        let bbox = [gb.x_min, gb.y_min, gb.x_max, gb.y_max];

        let mut widths = [0u16; WIDTH_SLOTS];
        for (slot, width) in widths.iter_mut().enumerate() {
            let code = FIRST_CHAR + slot as u8;
            if let Some(ch) = win_ansi_char(code) {
                if let Some(glyph) = face.glyph_index(ch) {
                    *width = face.glyph_hor_advance(glyph).unwrap_or(0);
                }
            }
        }

        debug!(
            "Parsed font '{}' ({} units/em, {} bytes)",
            postscript_name,
            units_per_em,
            data.len()
        );

        Ok(Self {
            data,
            postscript_name,
            units_per_em,
            ascent,
            descent,
            cap_height,
            bbox,
            widths,
        })
    }

    /// Raw font bytes, embedded verbatim as the `FontFile2` stream.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    /// Ascent in 1000-unit glyph space.
    pub fn ascent(&self) -> i64 {
        self.to_glyph_space(self.ascent)
    }

    /// Descent in 1000-unit glyph space (negative below the baseline).
    pub fn descent(&self) -> i64 {
        self.to_glyph_space(self.descent)
    }

    /// Capital height in 1000-unit glyph space.
    pub fn cap_height(&self) -> i64 {
        self.to_glyph_space(self.cap_height)
    }

    /// Font bounding box in 1000-unit glyph space.
    pub fn bbox(&self) -> [i64; 4] {
        [
            self.to_glyph_space(self.bbox[0]),
            self.to_glyph_space(self.bbox[1]),
            self.to_glyph_space(self.bbox[2]),
            self.to_glyph_space(self.bbox[3]),
        ]
    }

    /// Advance widths for codes [`FIRST_CHAR`]..=[`LAST_CHAR`] in 1000-unit
    /// glyph space, in code order, for the font dictionary's `Widths` array.
    pub fn widths(&self) -> Vec<i64> {
        self.widths
            .iter()
            .map(|&w| (w as f64 * 1000.0 / self.units_per_em as f64).round() as i64)
            .collect()
    }

    /// Width of one character at the given size, in points.
    ///
    /// Characters outside WinAnsi measure as `?`, matching what the encoder
    /// substitutes at draw time.
    pub fn char_width(&self, ch: char, size: f32) -> f32 {
        let code = win_ansi_byte(ch).unwrap_or(b'?');
        let units = self.widths[(code - FIRST_CHAR) as usize];
        units as f32 * size / self.units_per_em as f32
    }

    /// Width of a string at the given size, in points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, size)).sum()
    }

    fn to_glyph_space(&self, units: i16) -> i64 {
        (units as f64 * 1000.0 / self.units_per_em as f64).round() as i64
    }
}

impl fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedFont")
            .field("postscript_name", &self.postscript_name)
            .field("units_per_em", &self.units_per_em)
            .field("ascent", &self.ascent)
            .field("descent", &self.descent)
            .field("data_len", &self.data.len())
            .finish()
    }
}

// ── WinAnsi (CP-1252) mapping ────────────────────────────────────────────────

/// The 0x80–0x9F window, where CP-1252 departs from Latin-1. Codes absent
/// from this table (0x81, 0x8D, 0x8F, 0x90, 0x9D) are undefined.
const WIN_ANSI_HIGH: [(u8, char); 27] = [
    (0x80, '\u{20AC}'), // euro
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'), // ellipsis
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'), // left single quote
    (0x92, '\u{2019}'), // right single quote
    (0x93, '\u{201C}'), // left double quote
    (0x94, '\u{201D}'), // right double quote
    (0x95, '\u{2022}'), // bullet
    (0x96, '\u{2013}'), // en dash
    (0x97, '\u{2014}'), // em dash
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'), // trademark
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Map a character to its WinAnsi code, if it has one.
pub fn win_ansi_byte(ch: char) -> Option<u8> {
    match ch {
        ' '..='~' => Some(ch as u8),
        '\u{A0}'..='\u{FF}' => Some(ch as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|&&(_, c)| c == ch)
            .map(|&(code, _)| code),
    }
}

/// Map a WinAnsi code back to its character, if the code is defined.
pub fn win_ansi_char(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E => Some(code as char),
        0xA0..=0xFF => Some(code as char),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|&&(c, _)| c == code)
            .map(|&(_, ch)| ch),
    }
}

/// Encode text as WinAnsi bytes, substituting `?` for anything unmappable.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| win_ansi_byte(ch).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_font() -> EmbeddedFont {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSans.ttf");
        EmbeddedFont::load(Path::new(path)).unwrap()
    }

    #[test]
    fn win_ansi_ascii_is_identity() {
        assert_eq!(win_ansi_byte('A'), Some(0x41));
        assert_eq!(win_ansi_byte(' '), Some(0x20));
        assert_eq!(win_ansi_char(0x41), Some('A'));
    }

    #[test]
    fn win_ansi_latin1_range() {
        assert_eq!(win_ansi_byte('é'), Some(0xE9));
        assert_eq!(win_ansi_byte('ñ'), Some(0xF1));
        assert_eq!(win_ansi_char(0xE9), Some('é'));
    }

    #[test]
    fn win_ansi_high_window() {
        assert_eq!(win_ansi_byte('€'), Some(0x80));
        assert_eq!(win_ansi_byte('\u{2014}'), Some(0x97));
        assert_eq!(win_ansi_char(0x80), Some('€'));
        // Undefined codes
        for code in [0x81u8, 0x8D, 0x8F, 0x90, 0x9D] {
            assert_eq!(win_ansi_char(code), None, "code {code:#x}");
        }
    }

    #[test]
    fn encode_substitutes_question_mark() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("Ω"), b"?".to_vec());
        assert_eq!(encode_win_ansi("día"), vec![b'd', 0xED, b'a']);
    }

    #[test]
    fn loads_fixture_font() {
        let font = fixture_font();
        // The fixture's name table lists a Macintosh record (undecodable)
        // before the Windows one; the name must still come through.
        assert_eq!(font.postscript_name(), "DejaVuSans");
        assert!(font.ascent() > 0);
        assert!(font.descent() < 0);
        assert_eq!(font.widths().len(), 224);
        assert!(!font.data().is_empty());
    }

    #[test]
    fn debug_output_stays_compact() {
        let font = fixture_font();
        let dump = format!("{font:?}");
        assert!(dump.contains("DejaVuSans"), "got: {dump}");
        assert!(
            dump.len() < 200,
            "font bytes must not be dumped ({} chars)",
            dump.len()
        );
    }

    #[test]
    fn measurement_scales_with_size_and_length() {
        let font = fixture_font();
        let w1 = font.text_width("Hola", 12.0);
        let w2 = font.text_width("Hola mundo", 12.0);
        let w3 = font.text_width("Hola", 24.0);
        assert!(w1 > 0.0);
        assert!(w2 > w1);
        assert!((w3 - 2.0 * w1).abs() < 0.01);
    }

    #[test]
    fn missing_font_file_is_render_error() {
        let err = EmbeddedFont::load(Path::new("/no/such/font.ttf")).unwrap_err();
        assert!(matches!(err, TranslateError::Render { .. }), "got: {err}");
        assert!(err.to_string().contains("/no/such/font.ttf"));
    }

    #[test]
    fn garbage_bytes_are_render_error() {
        let err = EmbeddedFont::from_bytes(vec![0xDE, 0xAD, 0xBE, 0xEF]).unwrap_err();
        assert!(matches!(err, TranslateError::Render { .. }), "got: {err}");
    }
}
