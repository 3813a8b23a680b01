//! Page geometry and per-role margin columns.

use crate::classifier::Role;

/// Left and right bounds of the column a role's text is drawn in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginSpec {
    pub left: f32,
    pub right: f32,
}

impl MarginSpec {
    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }
}

/// Page geometry in PDF points, origin at the bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    /// Column for action, scene headings, titles and the table of contents.
    pub action: MarginSpec,
    pub dialogue: MarginSpec,
    pub character: MarginSpec,
    pub parenthetical: MarginSpec,
    pub line_height: f32,
    /// Distance from the page top to the first baseline of a fresh page.
    pub top_offset: f32,
    pub body_bottom: f32,
    pub toc_bottom: f32,
    /// Gap below the table of contents heading.
    pub toc_heading_gap: f32,
    pub footer_baseline: f32,
    /// Distance from the page top to the running header baseline.
    pub header_offset: f32,
    /// Distance from the right edge to the right end of the page number.
    pub page_number_inset: f32,
    /// Distances from the page top to the title page's title, byline and author.
    pub cover_title_offset: f32,
    pub cover_byline_offset: f32,
    pub cover_author_offset: f32,
}

impl Default for LayoutConfig {
    /// A4 with a screenplay column layout.
    fn default() -> Self {
        Self {
            page_width: 595.2756,
            page_height: 841.8898,
            action: MarginSpec::new(105.0, 525.0),
            dialogue: MarginSpec::new(200.0, 434.0),
            character: MarginSpec::new(294.0, 525.0),
            parenthetical: MarginSpec::new(252.0, 392.0),
            line_height: 16.0,
            top_offset: 60.0,
            body_bottom: 60.0,
            toc_bottom: 70.0,
            toc_heading_gap: 20.0,
            footer_baseline: 30.0,
            header_offset: 30.0,
            page_number_inset: 40.0,
            cover_title_offset: 350.0,
            cover_byline_offset: 382.0,
            cover_author_offset: 414.0,
        }
    }
}

impl LayoutConfig {
    /// Roles without a dedicated column use the action margins.
    pub fn margins_for(&self, role: Role) -> MarginSpec {
        match role {
            Role::Dialogue => self.dialogue,
            Role::Character => self.character,
            Role::Parenthetical => self.parenthetical,
            _ => self.action,
        }
    }

    /// Baseline of the first line on a fresh page.
    pub fn page_top(&self) -> f32 {
        self.page_height - self.top_offset
    }

    pub fn centre_x(&self) -> f32 {
        self.page_width / 2.0
    }
}
