//! Test doubles for the measuring and drawing seams.

use crate::canvas::{Canvas, Rect};
use crate::fonts::{LayoutFont, TextMeasure};

/// Every character is `em` wide.
#[derive(Debug, Clone, Copy)]
pub struct FixedPitch {
    em: f32,
}

impl FixedPitch {
    pub fn new(em: f32) -> Self {
        Self { em }
    }
}

impl TextMeasure for FixedPitch {
    fn text_width(&self, text: &str, font: LayoutFont) -> f32 {
        text.chars().count() as f32 * self.em * font.size
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Title(String),
    Author(String),
    Draw {
        page: usize,
        x: f32,
        y: f32,
        font: LayoutFont,
        text: String,
    },
    ShowPage,
    Bookmark {
        page: usize,
        key: String,
        top: f32,
    },
    Outline {
        title: String,
        key: String,
    },
    Link {
        page: usize,
        key: String,
        rect: Rect,
    },
}

/// Records every call; pages are counted from 1.
pub struct RecordingCanvas {
    measure: FixedPitch,
    page: usize,
    pub ops: Vec<Op>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            measure: FixedPitch::new(0.6),
            page: 1,
            ops: Vec::new(),
        }
    }

    pub fn pages_shown(&self) -> usize {
        self.ops.iter().filter(|op| **op == Op::ShowPage).count()
    }

    /// Texts drawn on canvas page `page`, in drawing order.
    pub fn texts_on(&self, page: usize) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Draw { page: p, text, .. } if *p == page => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn draws(&self) -> impl Iterator<Item = (usize, f32, f32, LayoutFont, &str)> {
        self.ops.iter().filter_map(|op| match op {
            Op::Draw {
                page,
                x,
                y,
                font,
                text,
            } => Some((*page, *x, *y, *font, text.as_str())),
            _ => None,
        })
    }
}

impl TextMeasure for RecordingCanvas {
    fn text_width(&self, text: &str, font: LayoutFont) -> f32 {
        self.measure.text_width(text, font)
    }
}

impl Canvas for RecordingCanvas {
    fn set_title(&mut self, title: &str) {
        self.ops.push(Op::Title(title.to_string()));
    }

    fn set_author(&mut self, author: &str) {
        self.ops.push(Op::Author(author.to_string()));
    }

    fn draw_string(&mut self, x: f32, y: f32, font: LayoutFont, text: &str) {
        self.ops.push(Op::Draw {
            page: self.page,
            x,
            y,
            font,
            text: text.to_string(),
        });
    }

    fn show_page(&mut self) {
        self.ops.push(Op::ShowPage);
        self.page += 1;
    }

    fn bookmark(&mut self, key: &str, top: f32) {
        self.ops.push(Op::Bookmark {
            page: self.page,
            key: key.to_string(),
            top,
        });
    }

    fn add_outline_entry(&mut self, title: &str, key: &str) {
        self.ops.push(Op::Outline {
            title: title.to_string(),
            key: key.to_string(),
        });
    }

    fn link(&mut self, key: &str, rect: Rect) {
        self.ops.push(Op::Link {
            page: self.page,
            key: key.to_string(),
            rect,
        });
    }
}
