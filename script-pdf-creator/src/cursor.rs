//! Running page state: page number, vertical position and active font.

use crate::canvas::Canvas;
use crate::fonts::LayoutFont;
use crate::layout::LayoutConfig;

/// What every page gets stamped with when it is finished.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFurniture {
    /// Footer text, centred at the bottom.
    pub footer: String,
    /// Running document title, centred at the top.
    pub header: String,
    pub font: LayoutFont,
}

/// Owns the page being filled. Offsets are PDF baselines, so they shrink down the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    page_number: u32,
    vertical_offset: f32,
    active_font: LayoutFont,
    page_top: f32,
}

impl PageCursor {
    /// A cursor at the top of page `page_number`.
    pub fn new(page_number: u32, page_top: f32, font: LayoutFont) -> Self {
        Self {
            page_number,
            vertical_offset: page_top,
            active_font: font,
            page_top,
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }

    pub fn active_font(&self) -> LayoutFont {
        self.active_font
    }

    pub fn set_font(&mut self, font: LayoutFont) {
        self.active_font = font;
    }

    /// Whether a line of `line_height` would cross `bottom_margin`.
    pub fn would_overflow(&self, line_height: f32, bottom_margin: f32) -> bool {
        self.vertical_offset - line_height < bottom_margin
    }

    pub fn advance(&mut self, line_height: f32) {
        self.vertical_offset -= line_height.max(0.0);
    }

    /// Stamp page number, footer and header on the current page, finish it and move to
    /// the top of the next one.
    pub fn rollover<C>(&mut self, canvas: &mut C, furniture: &PageFurniture, layout: &LayoutConfig)
    where
        C: Canvas + ?Sized,
    {
        let font = furniture.font;
        canvas.draw_right_string(
            layout.page_width - layout.page_number_inset,
            layout.footer_baseline,
            font,
            &self.page_number.to_string(),
        );
        canvas.draw_centred_string(layout.centre_x(), layout.footer_baseline, font, &furniture.footer);
        canvas.draw_centred_string(
            layout.centre_x(),
            layout.page_height - layout.header_offset,
            font,
            &furniture.header,
        );
        canvas.show_page();

        log::debug!("finished page {}", self.page_number);
        self.page_number += 1;
        self.vertical_offset = self.page_top;
    }
}
