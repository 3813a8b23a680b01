//! Text wrapping for script columns
//!
//! Greedy, whitespace-delimited line filling against measured widths. No hyphenation:
//! a word wider than its column is emitted on a line of its own and overflows.

use crate::fonts::{LayoutFont, TextMeasure};

/// What a tab becomes before measuring: two groups of four spaces.
pub const TAB_EXPANSION: &str = "        ";

pub fn expand_tabs(text: &str) -> String {
    text.replace('\t', TAB_EXPANSION)
}

/// Split `text` into lines no wider than `max_width`, keeping word order.
///
/// Text that already fits comes back as a single line with tabs expanded. Runs of
/// spaces between words collapse to one space when the text has to be broken.
pub fn wrap<M>(text: &str, font: LayoutFont, max_width: f32, measure: &M) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let text = expand_tabs(text);
    if measure.text_width(&text, font) <= max_width {
        return vec![text];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split(' ').filter(|word| !word.is_empty()) {
        let candidate = format!("{current_line}{word}");
        if measure.text_width(&candidate, font) <= max_width {
            current_line = candidate;
            current_line.push(' ');
            continue;
        }

        let finished = current_line.trim();
        if !finished.is_empty() {
            lines.push(finished.to_string());
        }
        if measure.text_width(word, font) > max_width {
            log::debug!("word of {} chars overflows a {max_width:.0}pt column", word.len());
        }
        current_line = format!("{word} ");
    }

    let finished = current_line.trim();
    if !finished.is_empty() {
        lines.push(finished.to_string());
    }
    lines
}
