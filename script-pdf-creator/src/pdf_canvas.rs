//! lopdf-backed canvas
//!
//! Buffers each page's content operations, then at finalization writes the page tree,
//! font resources, named destinations, link annotations, outline and document info.

use crate::canvas::{Canvas, Rect};
use crate::error::{Result, ScriptError};
use crate::fonts::{FontBook, FontFace, LayoutFont, LoadedFace, TextMeasure};
use crate::layout::LayoutConfig;
use lopdf::{
    content::{Content, Operation},
    dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat,
};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use unicode_script::UnicodeScript;

const FIRST_CHAR: u32 = 32;
const LAST_CHAR: u32 = 255;

/// A page whose content is complete but not yet written.
struct FinishedPage {
    id: ObjectId,
    content: Content,
    links: Vec<(String, Rect)>,
}

pub struct PdfCanvas {
    fonts: FontBook,
    page_width: f32,
    page_height: f32,
    document: Document,
    pages_id: ObjectId,
    font_objects: BTreeMap<FontFace, ObjectId>,
    current_page_id: ObjectId,
    content: Content,
    links: Vec<(String, Rect)>,
    finished: Vec<FinishedPage>,
    destinations: BTreeMap<String, (ObjectId, f32)>,
    outline: Vec<(String, String)>,
    title: Option<String>,
    author: Option<String>,
}

impl PdfCanvas {
    pub fn new(fonts: FontBook, layout: &LayoutConfig) -> Self {
        let mut document = Document::new();
        let pages_id = document.new_object_id();
        let current_page_id = document.new_object_id();

        let mut canvas = Self {
            fonts,
            page_width: layout.page_width,
            page_height: layout.page_height,
            document,
            pages_id,
            font_objects: BTreeMap::new(),
            current_page_id,
            content: Content { operations: Vec::new() },
            links: Vec::new(),
            finished: Vec::new(),
            destinations: BTreeMap::new(),
            outline: Vec::new(),
            title: None,
            author: None,
        };
        canvas.initialize_fonts();
        canvas
    }

    /// Pages finished so far.
    #[cfg(test)]
    pub(crate) fn page_count(&self) -> usize {
        self.finished.len()
    }

    fn initialize_fonts(&mut self) {
        let faces: Vec<LoadedFace> = self.fonts.faces().cloned().collect();
        log::debug!("registering {} faces of {}", faces.len(), self.fonts.family());
        for face in &faces {
            let font_id = self.add_font_to_document(face);
            self.font_objects.insert(face.face, font_id);
        }
    }

    /// Embedded TrueType when the face came from a file, built-in Courier otherwise.
    fn add_font_to_document(&mut self, face: &LoadedFace) -> ObjectId {
        let Some(data) = face.embedded_data() else {
            return self.document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.builtin_base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
        };

        if let Some(path) = face.source_path() {
            log::debug!("embedding {} from {}", face.name, path.display());
        }
        let font_file = Stream::new(
            dictionary! { "Length1" => data.len() as i64 },
            data.to_vec(),
        );
        let font_file_id = self.document.add_object(font_file);

        let (ascent, descent) = face.vertical_metrics();
        let descriptor_id = self.document.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(face.name.clone().into_bytes()),
            // FixedPitch | Nonsymbolic
            "Flags" => Object::Integer(33),
            "FontBBox" => vec![
                Object::Integer(-100),
                Object::Integer(descent.round() as i64),
                Object::Integer(1000),
                Object::Integer(ascent.round() as i64),
            ],
            "ItalicAngle" => Object::Integer(0),
            "Ascent" => Object::Integer(ascent.round() as i64),
            "Descent" => Object::Integer(descent.round() as i64),
            "CapHeight" => Object::Integer(700),
            "StemV" => Object::Integer(80),
            "FontFile2" => font_file_id,
        });

        let widths: Vec<Object> = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| {
                let width = u8::try_from(code)
                    .ok()
                    .and_then(win_ansi_char)
                    .map_or(0.0, |ch| face.char_width(ch, 1000.0));
                Object::Real(width)
            })
            .collect();

        self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => Object::Name(face.name.clone().into_bytes()),
            "FirstChar" => FIRST_CHAR as i64,
            "LastChar" => LAST_CHAR as i64,
            "Widths" => widths,
            "Encoding" => "WinAnsiEncoding",
            "FontDescriptor" => descriptor_id,
        })
    }

    fn create_resources_dict(&self) -> Dictionary {
        let mut font_dict = Dictionary::new();
        for (face, &font_id) in &self.font_objects {
            font_dict.set(face.resource_name(), Object::Reference(font_id));
        }
        dictionary! { "Font" => font_dict }
    }

    fn destination(&self, key: &str) -> Result<Object> {
        self.destinations
            .get(key)
            .map(|_| Object::Name(key.as_bytes().to_vec()))
            .ok_or_else(|| ScriptError::UnresolvedLink(key.to_string()))
    }

    fn write_page(&mut self, page: FinishedPage, resources: &Dictionary) -> Result<()> {
        let mut annots = Vec::with_capacity(page.links.len());
        for (key, rect) in &page.links {
            let annot = dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => rect.iter().map(|&v| Object::Real(v)).collect::<Vec<_>>(),
                "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
                "Dest" => self.destination(key)?,
            };
            annots.push(Object::Reference(self.document.add_object(annot)));
        }

        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), page.content.encode()?));

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Resources" => resources.clone(),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.page_width),
                Object::Real(self.page_height),
            ],
            "Contents" => content_id,
        };
        if !annots.is_empty() {
            page_dict.set("Annots", annots);
        }
        self.document.objects.insert(page.id, Object::Dictionary(page_dict));
        Ok(())
    }

    fn write_outline(&mut self) -> Result<Option<ObjectId>> {
        if self.outline.is_empty() {
            return Ok(None);
        }

        let root_id = self.document.new_object_id();
        let ids: Vec<ObjectId> = self.outline.iter().map(|_| self.document.new_object_id()).collect();

        for (i, (title, key)) in self.outline.iter().enumerate() {
            let mut item = dictionary! {
                "Title" => text_string(title),
                "Parent" => root_id,
                "Dest" => self.destination(key)?,
            };
            if i > 0 {
                item.set("Prev", ids[i - 1]);
            }
            if let Some(&next) = ids.get(i + 1) {
                item.set("Next", next);
            }
            self.document.objects.insert(ids[i], Object::Dictionary(item));
        }

        let (first, last) = (ids[0], ids[ids.len() - 1]);
        self.document.objects.insert(
            root_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => first,
                "Last" => last,
                "Count" => ids.len() as i64,
            }),
        );
        Ok(Some(root_id))
    }

    /// Write the document structure. Pending content becomes a last page.
    pub fn finish(mut self) -> Result<Document> {
        if !self.content.operations.is_empty() || self.finished.is_empty() {
            self.show_page();
        }

        let resources = self.create_resources_dict();
        let pages = std::mem::take(&mut self.finished);
        let kids: Vec<Object> = pages.iter().map(|page| Object::Reference(page.id)).collect();
        let page_count = pages.len();
        for page in pages {
            self.write_page(page, &resources)?;
        }

        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
            }),
        );

        let mut dests = Dictionary::new();
        for (key, &(page_id, top)) in &self.destinations {
            dests.set(
                key.as_bytes().to_vec(),
                vec![Object::Reference(page_id), "FitH".into(), Object::Real(top)],
            );
        }
        let dests_id = self.document.add_object(dests);

        let mut info = dictionary! {
            "Producer" => Object::string_literal("Script PDF Creator"),
            "Creator" => Object::string_literal("scriptwriter"),
        };
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        if let Some(author) = &self.author {
            info.set("Author", text_string(author));
        }
        let info_id = self.document.add_object(info);

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
            "Dests" => dests_id,
        };
        if let Some(outlines_id) = self.write_outline()? {
            catalog.set("Outlines", outlines_id);
            catalog.set("PageMode", "UseOutlines");
        }
        let catalog_id = self.document.add_object(catalog);

        self.document.trailer.set("Root", catalog_id);
        self.document.trailer.set("Info", info_id);

        log::debug!(
            "PDF has {} objects, {} pages, {} destinations",
            self.document.objects.len(),
            page_count,
            self.destinations.len()
        );
        Ok(self.document)
    }

    /// Finalize and write the document to `path`.
    pub fn save(self, path: &Path) -> Result<()> {
        let output_error = |reason: String| ScriptError::Output {
            path: path.to_path_buf(),
            reason,
        };

        let mut document = self.finish()?;
        document.compress();

        let file = std::fs::File::create(path).map_err(|e| output_error(e.to_string()))?;
        let mut writer = std::io::BufWriter::new(file);
        document
            .save_to(&mut writer)
            .map_err(|e| output_error(e.to_string()))?;
        writer.flush().map_err(|e| output_error(e.to_string()))?;
        Ok(())
    }
}

impl TextMeasure for PdfCanvas {
    fn text_width(&self, text: &str, font: LayoutFont) -> f32 {
        self.fonts.text_width(text, font)
    }
}

impl Canvas for PdfCanvas {
    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn set_author(&mut self, author: &str) {
        self.author = Some(author.to_string());
    }

    fn draw_string(&mut self, x: f32, y: f32, font: LayoutFont, text: &str) {
        let ops = &mut self.content.operations;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(font.face.resource_name().as_bytes().to_vec()),
                Object::Real(font.size),
            ],
        ));
        ops.push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    fn show_page(&mut self) {
        let next_id = self.document.new_object_id();
        let page = FinishedPage {
            id: std::mem::replace(&mut self.current_page_id, next_id),
            content: std::mem::replace(&mut self.content, Content { operations: Vec::new() }),
            links: std::mem::take(&mut self.links),
        };
        self.finished.push(page);
    }

    fn bookmark(&mut self, key: &str, top: f32) {
        self.destinations
            .insert(key.to_string(), (self.current_page_id, top));
    }

    fn add_outline_entry(&mut self, title: &str, key: &str) {
        self.outline.push((title.to_string(), key.to_string()));
    }

    fn link(&mut self, key: &str, rect: Rect) {
        self.links.push((key.to_string(), rect));
    }
}

/// WinAnsi assignments for 0x80..=0x9F, where it departs from Latin-1.
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

/// The character a WinAnsi code draws, if it draws one.
fn win_ansi_char(code: u8) -> Option<char> {
    match code {
        0x80..=0x9F => WIN_ANSI_HIGH[usize::from(code - 0x80)],
        _ => Some(char::from(code)),
    }
}

/// The WinAnsi code for `ch`. C1 controls have none.
fn win_ansi_byte(ch: char) -> Option<u8> {
    match u32::from(ch) {
        0x80..=0x9F => None,
        code @ 0..=0xFF => u8::try_from(code).ok(),
        _ => WIN_ANSI_HIGH
            .iter()
            .position(|&mapped| mapped == Some(ch))
            .and_then(|index| u8::try_from(0x80 + index).ok()),
    }
}

/// Single-byte WinAnsi text. Characters without a WinAnsi code become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut dropped = None;
    let bytes = text
        .chars()
        .map(|ch| {
            win_ansi_byte(ch).unwrap_or_else(|| {
                dropped.get_or_insert(ch);
                b'?'
            })
        })
        .collect();
    if let Some(ch) = dropped {
        log::warn!(
            "{:?} script text cannot be encoded, replaced with '?' in {:?}",
            ch.script(),
            text
        );
    }
    bytes
}

/// PDF text string: literal for ASCII, UTF-16BE with a byte order mark otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut utf16be = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        utf16be.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(utf16be, StringFormat::Hexadecimal)
}
