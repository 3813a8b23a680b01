//! Script PDF generation
//!
//! Assembles the whole document: title page, linked table of contents, body pages with
//! running header and footer, then finalizes and writes the PDF.

use crate::canvas::Canvas;
use crate::classifier::{parse_script, Metadata, Script};
use crate::cursor::{PageCursor, PageFurniture};
use crate::error::{Result, ScriptError};
use crate::fonts::{FontBook, FontFamily, StyleTable};
use crate::layout::LayoutConfig;
use crate::pdf_canvas::PdfCanvas;
use crate::renderer::Renderer;
use crate::toc::{index_contents, BookmarkTarget, TocEntry};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_FOOTER: &str = "Property of User";
const TOC_HEADING: &str = "Table of Contents";
const BYLINE: &str = "Written by";

/// Everything configurable about a run.
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    /// Text stamped at the bottom centre of every page.
    pub footer: String,
    pub font_family: FontFamily,
    /// Directory holding the family's TrueType files.
    pub font_dir: PathBuf,
    pub layout: LayoutConfig,
    pub styles: StyleTable,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            footer: DEFAULT_FOOTER.to_string(),
            font_family: FontFamily::default(),
            font_dir: PathBuf::from("."),
            layout: LayoutConfig::default(),
            styles: StyleTable::default(),
        }
    }
}

/// What was laid out, and where the chapters landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSummary {
    pub title: Option<String>,
    pub author: Option<String>,
    pub page_count: u32,
    pub contents: Vec<TocEntry>,
    pub chapters: Vec<BookmarkTarget>,
}

impl LayoutSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Script PDF generator
pub struct ScriptPdfGenerator<'a> {
    options: &'a ScriptOptions,
}

impl<'a> ScriptPdfGenerator<'a> {
    pub fn new(options: &'a ScriptOptions) -> Self {
        Self { options }
    }

    /// Lay out `script` on `canvas`. The canvas is left ready to be finalized.
    pub fn generate<C>(&self, canvas: &mut C, script: &Script) -> Result<LayoutSummary>
    where
        C: Canvas + ?Sized,
    {
        let layout = &self.options.layout;
        let styles = &self.options.styles;

        self.title_page(canvas, &script.metadata);

        // The index must be complete before the first table of contents line is drawn.
        let toc = index_contents(&script.lines);

        let furniture = PageFurniture {
            footer: self.options.footer.clone(),
            header: script.metadata.header().to_string(),
            font: styles.furniture,
        };
        let mut cursor = PageCursor::new(2, layout.page_top(), styles.normal);

        log::info!("Creating Table of Contents...");
        self.table_of_contents(canvas, &mut cursor, &toc, &furniture);
        cursor.rollover(canvas, &furniture, layout);

        log::info!("Rendering Main Content...");
        let chapters = Renderer::new(layout, styles, &furniture).render(
            canvas,
            &mut cursor,
            &script.lines,
            &toc,
        )?;
        cursor.rollover(canvas, &furniture, layout);

        Ok(LayoutSummary {
            title: script.metadata.title.clone(),
            author: script.metadata.author.clone(),
            page_count: cursor.page_number() - 1,
            contents: toc,
            chapters,
        })
    }

    /// Centred title, byline and author, with the footer text but no page furniture.
    fn title_page<C>(&self, canvas: &mut C, metadata: &Metadata)
    where
        C: Canvas + ?Sized,
    {
        let layout = &self.options.layout;
        let styles = &self.options.styles;
        let centre = layout.centre_x();

        if let Some(title) = &metadata.title {
            canvas.set_title(title);
            canvas.draw_centred_string(
                centre,
                layout.page_height - layout.cover_title_offset,
                styles.cover_title,
                &title.to_uppercase(),
            );
        }
        canvas.draw_centred_string(centre, layout.footer_baseline, styles.furniture, &self.options.footer);

        if let Some(author) = &metadata.author {
            canvas.set_author(author);
            canvas.draw_centred_string(
                centre,
                layout.page_height - layout.cover_byline_offset,
                styles.cover_byline,
                BYLINE,
            );
            canvas.draw_centred_string(
                centre,
                layout.page_height - layout.cover_author_offset,
                styles.cover_author,
                author,
            );
        }
        canvas.show_page();
    }

    /// One linked line per chapter, paginated like the body but against the TOC bottom.
    fn table_of_contents<C>(
        &self,
        canvas: &mut C,
        cursor: &mut PageCursor,
        toc: &[TocEntry],
        furniture: &PageFurniture,
    ) where
        C: Canvas + ?Sized,
    {
        let layout = &self.options.layout;
        let styles = &self.options.styles;
        let column = layout.action;
        let line_height = layout.line_height;

        cursor.set_font(styles.title);
        canvas.draw_string(column.left, cursor.vertical_offset(), styles.title, TOC_HEADING);
        cursor.advance(layout.toc_heading_gap);
        cursor.set_font(styles.normal);

        for entry in toc {
            if cursor.would_overflow(line_height, layout.toc_bottom) {
                cursor.rollover(canvas, furniture, layout);
                cursor.set_font(styles.normal);
            }
            let y = cursor.vertical_offset();
            canvas.draw_string(column.left, y, cursor.active_font(), &entry.label);
            canvas.link(&entry.target_id, [column.left, y - 2.0, column.right, y + line_height]);
            cursor.advance(line_height);
        }
    }
}

/// Convert the script at `input` into a PDF at `output`.
pub fn create_script_pdf(input: &Path, output: &Path, options: &ScriptOptions) -> Result<LayoutSummary> {
    let fonts = FontBook::load(options.font_family, &options.font_dir)?;

    let source = std::fs::read_to_string(input).map_err(|source| ScriptError::Input {
        path: input.to_path_buf(),
        source,
    })?;
    let script = parse_script(&source);

    let mut canvas = PdfCanvas::new(fonts, &options.layout);
    let summary = ScriptPdfGenerator::new(options).generate(&mut canvas, &script)?;
    canvas.save(output)?;

    log::info!(
        "wrote {} pages, {} chapters to {}",
        summary.page_count,
        summary.chapters.len(),
        output.display()
    );
    Ok(summary)
}
