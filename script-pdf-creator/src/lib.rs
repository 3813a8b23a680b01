//! Script PDF Creator
//!
//! Turns plain-text screenplay markup into a paginated PDF: a title page, a linked
//! table of contents, and body pages laid out in screenplay columns with running
//! header, footer and page numbers. Text widths come from the selected monospace
//! family via fontdue; the document itself is written with lopdf.

pub mod canvas;
pub mod classifier;
pub mod cursor;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod pdf_canvas;
pub mod renderer;
pub mod script_generator;
pub mod toc;
pub mod typography;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used functions and types
pub use classifier::{classify, parse_script, ClassifiedLine, Metadata, Role, Script};
pub use error::{Result, ScriptError, Stage};
pub use fonts::{FontBook, FontFamily, StyleTable};
pub use layout::LayoutConfig;
pub use script_generator::{create_script_pdf, LayoutSummary, ScriptOptions, ScriptPdfGenerator};
pub use toc::{BookmarkTarget, TocEntry};
