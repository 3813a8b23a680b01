//! Body rendering: places every classified line in its column, wrapping and paginating
//! as it goes, and bookmarks chapter headings for the table of contents.

use crate::canvas::Canvas;
use crate::classifier::{ClassifiedLine, Role};
use crate::cursor::{PageCursor, PageFurniture};
use crate::error::Result;
use crate::fonts::StyleTable;
use crate::layout::LayoutConfig;
use crate::toc::{BookmarkTarget, ChapterCursor, TocEntry};
use crate::typography::wrap;

pub struct Renderer<'a> {
    layout: &'a LayoutConfig,
    styles: &'a StyleTable,
    furniture: &'a PageFurniture,
}

impl<'a> Renderer<'a> {
    pub fn new(layout: &'a LayoutConfig, styles: &'a StyleTable, furniture: &'a PageFurniture) -> Self {
        Self {
            layout,
            styles,
            furniture,
        }
    }

    /// Draw `lines` starting at the cursor's position.
    ///
    /// `toc` must be the index built from the same `lines`; each title line claims the
    /// next entry and a heading that does not match it aborts the render.
    pub fn render<C>(
        &self,
        canvas: &mut C,
        cursor: &mut PageCursor,
        lines: &[ClassifiedLine],
        toc: &[TocEntry],
    ) -> Result<Vec<BookmarkTarget>>
    where
        C: Canvas + ?Sized,
    {
        let mut chapters = ChapterCursor::new(toc);
        let mut bookmarks = Vec::with_capacity(toc.len());
        let line_height = self.layout.line_height;

        for line in lines {
            if line.text.is_empty() || !line.role.is_visible() {
                continue;
            }
            if line.role == Role::PageBreak {
                cursor.rollover(canvas, self.furniture, self.layout);
                continue;
            }

            let chapter = match line.role {
                Role::Title => Some(chapters.claim(line)?),
                _ => None,
            };
            let font = self.styles.font_for(line.role);
            cursor.set_font(font);
            let margins = self.layout.margins_for(line.role);

            let sub_lines = wrap(&line.text, font, margins.width(), &*canvas);
            for (index, text) in sub_lines.iter().enumerate() {
                if cursor.would_overflow(line_height, self.layout.body_bottom) {
                    cursor.rollover(canvas, self.furniture, self.layout);
                }
                let y = cursor.vertical_offset();
                canvas.draw_string(margins.left, y, cursor.active_font(), text);

                if let (0, Some(entry)) = (index, chapter) {
                    canvas.bookmark(&entry.target_id, y + font.size);
                    canvas.add_outline_entry(&entry.label, &entry.target_id);
                    bookmarks.push(BookmarkTarget {
                        label: entry.label.clone(),
                        target_id: entry.target_id.clone(),
                        page: cursor.page_number(),
                        vertical_offset: y,
                    });
                }
                cursor.advance(line_height);
            }
        }

        chapters.finish()?;
        Ok(bookmarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::parse_script;
    use crate::error::ScriptError;
    use crate::layout::MarginSpec;
    use crate::testing::{Op, RecordingCanvas};
    use crate::toc::index_contents;

    fn furniture() -> PageFurniture {
        PageFurniture {
            footer: "Property of User".into(),
            header: "Test".into(),
            font: StyleTable::default().furniture,
        }
    }

    fn run(
        source: &str,
        layout: &LayoutConfig,
        cursor: &mut PageCursor,
    ) -> (RecordingCanvas, Result<Vec<BookmarkTarget>>) {
        let script = parse_script(source);
        let toc = index_contents(&script.lines);
        let styles = StyleTable::default();
        let furniture = furniture();
        let mut canvas = RecordingCanvas::new();
        let result = Renderer::new(layout, &styles, &furniture).render(
            &mut canvas,
            cursor,
            &script.lines,
            &toc,
        );
        (canvas, result)
    }

    #[test]
    fn title_and_wrapped_dialogue() {
        let layout = LayoutConfig {
            dialogue: MarginSpec::new(200.0, 250.0),
            ..LayoutConfig::default()
        };
        let styles = StyleTable::default();
        let top = layout.page_top();
        let mut cursor = PageCursor::new(3, top, styles.normal);

        let (canvas, result) = run("/Opening\n'Hello there.\n", &layout, &mut cursor);
        let bookmarks = result.unwrap();

        let draws: Vec<_> = canvas.draws().collect();
        assert_eq!(draws[0], (1, 105.0, top, styles.title, "Opening"));
        assert_eq!(draws[1], (1, 200.0, top - 16.0, styles.normal, "Hello"));
        assert_eq!(draws[2], (1, 200.0, top - 32.0, styles.normal, "there."));

        assert!(canvas.ops.contains(&Op::Bookmark {
            page: 1,
            key: "chapter_1".into(),
            top: top + 20.0,
        }));
        assert!(canvas.ops.contains(&Op::Outline {
            title: "Opening".into(),
            key: "chapter_1".into(),
        }));
        assert_eq!(
            bookmarks,
            vec![BookmarkTarget {
                label: "Opening".into(),
                target_id: "chapter_1".into(),
                page: 3,
                vertical_offset: top,
            }]
        );
        assert_eq!(cursor.vertical_offset(), top - 48.0);
    }

    #[test]
    fn rollover_happens_before_line_at_threshold() {
        let layout = LayoutConfig::default();
        let mut cursor = PageCursor::new(7, 76.0, StyleTable::default().normal);

        let (canvas, result) = run("first\nsecond\n", &layout, &mut cursor);
        result.unwrap();

        assert_eq!(canvas.pages_shown(), 1);
        let show_at = canvas.ops.iter().position(|op| *op == Op::ShowPage).unwrap();
        let second_at = canvas
            .ops
            .iter()
            .position(|op| matches!(op, Op::Draw { text, .. } if text == "second"))
            .unwrap();
        assert!(show_at < second_at);
        assert_eq!(canvas.texts_on(1)[0], "first");
        assert_eq!(canvas.texts_on(2), vec!["second"]);
        assert_eq!(cursor.page_number(), 8);
    }

    #[test]
    fn wrapped_lines_roll_over_between_sub_lines() {
        let layout = LayoutConfig {
            action: MarginSpec::new(105.0, 150.0),
            ..LayoutConfig::default()
        };
        let mut cursor = PageCursor::new(2, 92.0, StyleTable::default().normal);

        let (canvas, result) = run("aaaa bbbb cccc\n", &layout, &mut cursor);
        result.unwrap();

        assert_eq!(canvas.texts_on(1), vec!["aaaa", "bbbb", "2", "Property of User", "Test"]);
        assert_eq!(canvas.texts_on(2), vec!["cccc"]);
    }

    #[test]
    fn page_break_marker_rolls_over_without_drawing() {
        let layout = LayoutConfig::default();
        let mut cursor = PageCursor::new(2, layout.page_top(), StyleTable::default().normal);

        let (canvas, result) = run("before\n=\nafter\n", &layout, &mut cursor);
        result.unwrap();

        assert_eq!(canvas.pages_shown(), 1);
        assert!(canvas.draws().all(|(.., text)| text != "="));
        assert_eq!(canvas.texts_on(2), vec!["after"]);
        assert_eq!(cursor.vertical_offset(), layout.page_top() - 16.0);
    }

    #[test]
    fn bookmarks_follow_toc_order() {
        let layout = LayoutConfig::default();
        let source: String = (1..=60).map(|n| format!("/Part {n}\nline {n}\n")).collect();
        let script = parse_script(&source);
        let toc = index_contents(&script.lines);
        let mut cursor = PageCursor::new(2, layout.page_top(), StyleTable::default().normal);

        let (_, result) = run(&source, &layout, &mut cursor);
        let bookmarks = result.unwrap();

        assert_eq!(bookmarks.len(), toc.len());
        for (entry, mark) in toc.iter().zip(&bookmarks) {
            assert_eq!(entry.label, mark.label);
            assert_eq!(entry.target_id, mark.target_id);
        }
        assert!(bookmarks.windows(2).all(|w| w[0].page <= w[1].page));
        assert!(cursor.page_number() > 2);
    }

    #[test]
    fn stale_index_aborts_render() {
        let layout = LayoutConfig::default();
        let styles = StyleTable::default();
        let furniture = furniture();
        let script = parse_script("/One\naction\n/Two\n");
        let toc = index_contents(&parse_script("/One\n").lines);
        let mut cursor = PageCursor::new(2, layout.page_top(), styles.normal);
        let mut canvas = RecordingCanvas::new();

        let err = Renderer::new(&layout, &styles, &furniture)
            .render(&mut canvas, &mut cursor, &script.lines, &toc)
            .unwrap_err();

        assert!(matches!(err, ScriptError::ChapterMismatch { line: 3, .. }));
    }
}
