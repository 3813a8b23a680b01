//! The drawing surface the layout engine talks to.

use crate::fonts::{LayoutFont, TextMeasure};

/// Axis-aligned rectangle in page coordinates: `[x0, y0, x1, y1]`.
pub type Rect = [f32; 4];

/// A paginated drawing target.
///
/// Drawing calls always land on the current page. Named jump targets and links are
/// resolved when the surface is finalized, so a link may name a target that is only
/// bookmarked later in the run.
pub trait Canvas: TextMeasure {
    fn set_title(&mut self, title: &str);

    fn set_author(&mut self, author: &str);

    /// Draw `text` with its baseline starting at `(x, y)`.
    fn draw_string(&mut self, x: f32, y: f32, font: LayoutFont, text: &str);

    /// Draw `text` so that it ends at `x`.
    fn draw_right_string(&mut self, x: f32, y: f32, font: LayoutFont, text: &str) {
        let width = self.text_width(text, font);
        self.draw_string(x - width, y, font, text);
    }

    /// Draw `text` centred on `x`.
    fn draw_centred_string(&mut self, x: f32, y: f32, font: LayoutFont, text: &str) {
        let width = self.text_width(text, font);
        self.draw_string(x - width / 2.0, y, font, text);
    }

    /// Finish the current page and start an empty one.
    fn show_page(&mut self);

    /// Record `key` as a jump target on the current page at height `top`.
    fn bookmark(&mut self, key: &str, top: f32);

    /// Add a top-level outline entry that opens the jump target `key`.
    fn add_outline_entry(&mut self, title: &str, key: &str);

    /// Make `rect` on the current page a link to the jump target `key`.
    fn link(&mut self, key: &str, rect: Rect);
}
