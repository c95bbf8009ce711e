//! Rendering: overlay translated text onto the source document.
//!
//! ## How the overlay works
//!
//! The source document's object graph is loaded with `lopdf` and left
//! intact — nothing is removed or re-flowed. The run adds exactly four
//! objects: a `FontFile2` stream carrying the TrueType bytes, a
//! `FontDescriptor`, a `TrueType` font dictionary with `WinAnsiEncoding`
//! and a `Widths` array, and one new content stream holding a single
//! `BT … ET` text block. The first page's `Contents` is promoted to an
//! array so the new stream paints after (on top of) the original content,
//! and the font is registered in the page's `Resources` under a
//! collision-free name.
//!
//! Pages other than the first are untouched, byte for byte.
//!
//! ## Layout constants
//!
//! The text block starts at a fixed offset from the top-left corner and is
//! word-wrapped against fixed side margins. Coordinates are absolute page
//! user space; there is no pagination — lines that fall below the media box
//! are clipped at view time.

use crate::error::TranslateError;
use crate::pipeline::font::{self, EmbeddedFont};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Left edge of the text block, in points.
pub const TEXT_X: f32 = 50.0;
/// First baseline sits this far below the top edge (4 × font size).
pub const TOP_OFFSET: f32 = 48.0;
/// Size the translated text is drawn at.
pub const FONT_SIZE: f32 = 12.0;
/// Baseline-to-baseline distance (font size + 2).
pub const LINE_LEADING: f32 = 14.0;
/// Combined left + right margin subtracted from the page width for wrapping.
pub const SIDE_MARGINS: f32 = 100.0;

/// Overlay `translated` onto the first page of `source_path` and write the
/// result to `output_path` atomically.
///
/// The font file is loaded inside the rendering task; a missing or broken
/// font surfaces as a rendering error before anything is written.
pub async fn render_overlay(
    source_path: &Path,
    translated: &str,
    output_path: &Path,
    font_path: &Path,
) -> Result<(), TranslateError> {
    let source = source_path.to_path_buf();
    let output = output_path.to_path_buf();
    let font_file = font_path.to_path_buf();
    let text = translated.to_string();

    tokio::task::spawn_blocking(move || render_overlay_blocking(&source, &text, &output, &font_file))
        .await
        .map_err(|e| TranslateError::Internal(format!("render task panicked: {e}")))?
}

/// Blocking implementation of the overlay render.
fn render_overlay_blocking(
    source_path: &Path,
    translated: &str,
    output_path: &Path,
    font_path: &Path,
) -> Result<(), TranslateError> {
    let font = EmbeddedFont::load(font_path)?;

    let bytes = std::fs::read(source_path).map_err(|e| TranslateError::Io {
        path: source_path.to_path_buf(),
        source: e,
    })?;
    let mut doc = Document::load_mem(&bytes).map_err(|e| TranslateError::Render {
        detail: format!("source document could not be loaded for editing: {e}"),
    })?;

    let first_page_id = *doc
        .get_pages()
        .values()
        .next()
        .ok_or_else(|| TranslateError::Render {
            detail: "source document has no pages".into(),
        })?;

    let media_box = resolve_media_box(&doc, first_page_id);
    let page_width = media_box[2] - media_box[0];
    let page_height = media_box[3] - media_box[1];

    // ── Embed the font ───────────────────────────────────────────────────
    let font_id = embed_font(&mut doc, &font)?;

    // ── Register it in the first page's resources ────────────────────────
    let mut resources = resolve_resources(&doc, first_page_id);
    let mut font_dict = match resources.get(b"Font") {
        Ok(Object::Dictionary(d)) => d.clone(),
        Ok(Object::Reference(id)) => doc
            .get_dictionary(*id)
            .map(|d| d.clone())
            .unwrap_or_else(|_| Dictionary::new()),
        _ => Dictionary::new(),
    };
    let res_name = unique_font_name(&font_dict);
    font_dict.set(res_name.as_bytes(), Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(font_dict));

    // ── Build the text block ─────────────────────────────────────────────
    let wrap_width = page_width - SIDE_MARGINS;
    let lines = wrap_text(&font, translated, FONT_SIZE, wrap_width);
    let baseline_y = page_height - TOP_OFFSET;
    let content = build_text_block(&res_name, &lines, baseline_y);

    let encoded = content.encode().map_err(|e| TranslateError::Render {
        detail: format!("content stream encoding failed: {e}"),
    })?;
    let compressed = deflate(&encoded).map_err(|e| TranslateError::Render {
        detail: format!("content stream compression failed: {e}"),
    })?;
    let content_id = doc.add_object(Stream::new(
        dictionary! { "Filter" => "FlateDecode" },
        compressed,
    ));
    attach_to_page(&mut doc, first_page_id, resources, content_id)?;

    info!(
        "Overlaid {} lines at ({TEXT_X}, {baseline_y}) on page 1",
        lines.len()
    );

    // ── Serialise and write atomically ───────────────────────────────────
    let mut out_bytes = Vec::new();
    doc.save_to(&mut out_bytes)
        .map_err(|e| TranslateError::Render {
            detail: format!("output document serialisation failed: {e}"),
        })?;

    write_atomic(output_path, &out_bytes)
}

/// Add the FontFile2 stream, descriptor, and font dictionary; return the
/// font dictionary's id.
fn embed_font(doc: &mut Document, font: &EmbeddedFont) -> Result<ObjectId, TranslateError> {
    let compressed = deflate(font.data()).map_err(|e| TranslateError::Render {
        detail: format!("font stream compression failed: {e}"),
    })?;

    let font_file_id = doc.add_object(Stream::new(
        dictionary! {
            "Filter" => "FlateDecode",
            "Length1" => font.data().len() as i64,
        },
        compressed,
    ));

    let ps_name = font.postscript_name().to_string();
    let bbox = font.bbox();
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(ps_name.clone().into_bytes()),
        // Bit 6 (nonsymbolic): the font uses a standard Latin character set.
        "Flags" => 32,
        "FontBBox" => Object::Array(bbox.iter().map(|&v| v.into()).collect()),
        "ItalicAngle" => 0,
        "Ascent" => font.ascent(),
        "Descent" => font.descent(),
        "CapHeight" => font.cap_height(),
        "StemV" => 80,
        "FontFile2" => font_file_id,
    });

    let widths: Vec<Object> = font.widths().into_iter().map(Object::Integer).collect();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "TrueType",
        "BaseFont" => Object::Name(ps_name.into_bytes()),
        "FirstChar" => font::FIRST_CHAR as i64,
        "LastChar" => font::LAST_CHAR as i64,
        "Widths" => Object::Array(widths),
        "FontDescriptor" => descriptor_id,
        "Encoding" => "WinAnsiEncoding",
    });

    debug!("Embedded font '{}'", font.postscript_name());
    Ok(font_id)
}

/// One `BT … ET` block: set font, colour, leading, position once, then one
/// `Tj` per wrapped line with `T*` advancing the baseline.
fn build_text_block(res_name: &str, lines: &[String], baseline_y: f32) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![res_name.into(), FONT_SIZE.into()]),
        Operation::new("rg", vec![0.into(), 0.into(), 0.into()]),
        Operation::new("TL", vec![LINE_LEADING.into()]),
        Operation::new("Td", vec![TEXT_X.into(), baseline_y.into()]),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        if !line.is_empty() {
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(
                    font::encode_win_ansi(line),
                    lopdf::StringFormat::Literal,
                )],
            ));
        }
    }
    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

/// Point the page at the combined resources and append the content stream,
/// promoting a single `Contents` reference to an array.
fn attach_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    resources: Dictionary,
    content_id: ObjectId,
) -> Result<(), TranslateError> {
    let page_dict = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| TranslateError::Render {
            detail: format!("first page dictionary is unusable: {e}"),
        })?;

    let new_contents = match page_dict.get(b"Contents") {
        Ok(Object::Reference(existing)) => Object::Array(vec![
            Object::Reference(*existing),
            Object::Reference(content_id),
        ]),
        Ok(Object::Array(existing)) => {
            let mut arr = existing.clone();
            arr.push(Object::Reference(content_id));
            Object::Array(arr)
        }
        _ => Object::Reference(content_id),
    };
    page_dict.set("Contents", new_contents);
    page_dict.set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Media box of the page, walking the `Parent` chain for inherited boxes.
/// Falls back to US Letter when nothing declares one.
fn resolve_media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let mut current = Some(page_id);
    // Parent chains are shallow; the cap only guards against cycles.
    for _ in 0..32 {
        let Some(id) = current else { break };
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };
        if let Ok(Object::Array(values)) = dict.get(b"MediaBox") {
            if values.len() == 4 {
                let nums: Vec<f32> = values.iter().filter_map(as_f32).collect();
                if nums.len() == 4 {
                    return [nums[0], nums[1], nums[2], nums[3]];
                }
            }
        }
        current = dict
            .get(b"Parent")
            .ok()
            .and_then(|p| p.as_reference().ok());
    }
    [0.0, 0.0, 612.0, 792.0]
}

/// Resources of the page, walking the `Parent` chain for inherited ones.
fn resolve_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut current = Some(page_id);
    for _ in 0..32 {
        let Some(id) = current else { break };
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };
        match dict.get(b"Resources") {
            Ok(Object::Dictionary(d)) => return d.clone(),
            Ok(Object::Reference(res_id)) => {
                if let Ok(d) = doc.get_dictionary(*res_id) {
                    return d.clone();
                }
            }
            _ => {}
        }
        current = dict
            .get(b"Parent")
            .ok()
            .and_then(|p| p.as_reference().ok());
    }
    Dictionary::new()
}

fn as_f32(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Pick a `F<n>` resource name not already taken by the page's fonts.
fn unique_font_name(font_dict: &Dictionary) -> String {
    let mut n = font_dict.len() + 1;
    loop {
        let name = format!("F{n}");
        if font_dict.get(name.as_bytes()).is_err() {
            return name;
        }
        n += 1;
    }
}

/// Greedy word wrap with measured widths.
///
/// Paragraph breaks (`\n`) are honoured; a single word wider than the wrap
/// width is hard-broken at character granularity so no line ever exceeds
/// `max_width`.
fn wrap_text(font: &EmbeddedFont, text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate_width = if current.is_empty() {
                font.text_width(word, size)
            } else {
                font.text_width(&current, size)
                    + font.char_width(' ', size)
                    + font.text_width(word, size)
            };

            if candidate_width <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if font.text_width(word, size) <= max_width {
                current.push_str(word);
            } else {
                current = hard_break(font, word, size, max_width, &mut lines);
            }
        }
        lines.push(current);
    }
    lines
}

/// Split an overlong word into pieces that fit, returning the still-open
/// final piece.
fn hard_break(
    font: &EmbeddedFont,
    word: &str,
    size: f32,
    max_width: f32,
    lines: &mut Vec<String>,
) -> String {
    let mut piece = String::new();
    for ch in word.chars() {
        let w = font.text_width(&piece, size) + font.char_width(ch, size);
        if w > max_width && !piece.is_empty() {
            lines.push(std::mem::take(&mut piece));
        }
        piece.push(ch);
    }
    piece
}

fn deflate(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}

/// Write through a sibling temp file and rename, so a crash mid-write never
/// leaves a truncated document at `output_path`.
fn write_atomic(output_path: &Path, bytes: &[u8]) -> Result<(), TranslateError> {
    let io_err = |e: std::io::Error| TranslateError::Io {
        path: output_path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let tmp = output_path.with_extension("pdf.tmp");
    std::fs::write(&tmp, bytes).map_err(io_err)?;
    std::fs::rename(&tmp, output_path).map_err(io_err)?;
    debug!("Wrote {} bytes to {}", bytes.len(), output_path.display());
    Ok(())
}
