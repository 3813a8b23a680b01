//! Table of contents indexing and chapter matching.
//!
//! The index pass runs over the same classified sequence the renderer later walks, and
//! the renderer claims entries strictly in order through [`ChapterCursor`].

use crate::classifier::{ClassifiedLine, Role};
use crate::error::{Result, ScriptError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub label: String,
    pub target_id: String,
}

/// Where a chapter heading actually landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarkTarget {
    pub label: String,
    pub target_id: String,
    pub page: u32,
    pub vertical_offset: f32,
}

/// Jump target name of the `n`th chapter, counted from 1.
pub fn chapter_id(n: usize) -> String {
    format!("chapter_{n}")
}

/// Build the ordered table of contents: one entry per title line.
pub fn index_contents(lines: &[ClassifiedLine]) -> Vec<TocEntry> {
    let mut toc = Vec::new();
    for line in lines.iter().filter(|line| line.role == Role::Title) {
        toc.push(TocEntry {
            label: line.text.clone(),
            target_id: chapter_id(toc.len() + 1),
        });
    }
    log::debug!("indexed {} chapters", toc.len());
    toc
}

/// Hands out table of contents entries to the renderer in order.
#[derive(Debug)]
pub struct ChapterCursor<'a> {
    entries: &'a [TocEntry],
    next: usize,
}

impl<'a> ChapterCursor<'a> {
    pub fn new(entries: &'a [TocEntry]) -> Self {
        Self { entries, next: 0 }
    }

    /// Claim the next entry for a title line. The entry must carry the line's text.
    pub fn claim(&mut self, line: &ClassifiedLine) -> Result<&'a TocEntry> {
        let mismatch = |expected: String| ScriptError::ChapterMismatch {
            line: line.line_number,
            text: line.text.clone(),
            expected,
        };

        let entry = self
            .entries
            .get(self.next)
            .ok_or_else(|| mismatch("no entries left".to_string()))?;
        if entry.label != line.text {
            return Err(mismatch(format!("{} '{}'", entry.target_id, entry.label)));
        }

        self.next += 1;
        Ok(entry)
    }

    /// Fail if any entry was never claimed.
    pub fn finish(self) -> Result<()> {
        match self.entries.get(self.next) {
            Some(first) => Err(ScriptError::UnrenderedChapters {
                count: self.entries.len() - self.next,
                first: first.label.clone(),
            }),
            None => Ok(()),
        }
    }
}
