//! Line classification for the screenplay markup.
//!
//! Each source line is mapped to a [`Role`] by its leading marker character. The script
//! is classified exactly once; the filtered sequence in [`Script::lines`] is what both the
//! table of contents pass and the render pass walk, so chapter numbering cannot drift.

use serde::Serialize;

/// Text of a line that forces a page break.
pub const PAGE_BREAK_MARKER: &str = "=";

const TITLE_KEY: &str = "title:";
const AUTHOR_KEY: &str = "author:";

/// Semantic category of a classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Title,
    SceneHeading,
    Character,
    Parenthetical,
    Dialogue,
    Action,
    Comment,
    Metadata,
    PageBreak,
}

impl Role {
    /// Whether lines of this role ever reach the page.
    pub fn is_visible(self) -> bool {
        !matches!(self, Role::Comment | Role::Metadata)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub role: Role,
    pub text: String,
    /// 1-based position in the source, 0 when classified outside a script.
    pub line_number: usize,
}

impl ClassifiedLine {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            line_number: 0,
        }
    }

    pub fn at_line(mut self, line_number: usize) -> Self {
        self.line_number = line_number;
        self
    }
}

/// Classify one raw source line. Total and pure: every input maps to exactly one line.
pub fn classify(raw: &str) -> ClassifiedLine {
    let line = raw.trim();

    let (role, text) = if let Some(rest) = line.strip_prefix('/') {
        (Role::Title, rest.trim().to_string())
    } else if let Some(rest) = line.strip_prefix('.') {
        (Role::SceneHeading, rest.trim().to_uppercase())
    } else if let Some(rest) = line.strip_prefix('@') {
        (Role::Character, rest.trim().to_uppercase())
    } else if line.starts_with('(') {
        (Role::Parenthetical, line.to_string())
    } else if line.starts_with('#') {
        (Role::Comment, String::new())
    } else if let Some(rest) = line.strip_prefix('\'') {
        (Role::Dialogue, rest.trim().to_string())
    } else if line.starts_with(TITLE_KEY) || line.starts_with(AUTHOR_KEY) {
        (Role::Metadata, String::new())
    } else {
        (Role::Action, line.to_string())
    };

    if role.is_visible() && text == PAGE_BREAK_MARKER {
        return ClassifiedLine::new(Role::PageBreak, text);
    }
    ClassifiedLine::new(role, text)
}

/// Title and author pulled from the `title:` / `author:` lines. First occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl Metadata {
    /// Running header text; empty when the script declares no title.
    pub fn header(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    fn absorb(&mut self, line: &str) {
        if let Some(value) = line.strip_prefix(TITLE_KEY) {
            self.title.get_or_insert_with(|| value.trim().to_string());
        } else if let Some(value) = line.strip_prefix(AUTHOR_KEY) {
            self.author.get_or_insert_with(|| value.trim().to_string());
        }
    }
}

/// A classified script: metadata plus the layout-ready line sequence.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub metadata: Metadata,
    /// Visible lines only. Comments, metadata and blank lines are already removed.
    pub lines: Vec<ClassifiedLine>,
}

/// Read metadata, classify every line and drop everything that never produces output.
pub fn parse_script(source: &str) -> Script {
    let mut script = Script::default();

    for (index, raw) in source.lines().enumerate() {
        let classified = classify(raw).at_line(index + 1);
        match classified.role {
            Role::Metadata => script.metadata.absorb(raw.trim()),
            Role::Comment => {}
            _ if classified.text.is_empty() => {}
            _ => script.lines.push(classified),
        }
    }

    log::debug!(
        "classified {} visible lines (title: {:?})",
        script.lines.len(),
        script.metadata.title
    );
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_select_roles() {
        assert_eq!(classify("/ Opening "), ClassifiedLine::new(Role::Title, "Opening"));
        assert_eq!(
            classify(".int. kitchen - night"),
            ClassifiedLine::new(Role::SceneHeading, "INT. KITCHEN - NIGHT")
        );
        assert_eq!(classify("@ mai"), ClassifiedLine::new(Role::Character, "MAI"));
        assert_eq!(
            classify("  (quietly)"),
            ClassifiedLine::new(Role::Parenthetical, "(quietly)")
        );
        assert_eq!(classify("# note to self").role, Role::Comment);
        assert_eq!(
            classify("'Hello there."),
            ClassifiedLine::new(Role::Dialogue, "Hello there.")
        );
        assert_eq!(classify("title: Something").role, Role::Metadata);
        assert_eq!(classify("author: Someone").role, Role::Metadata);
        assert_eq!(
            classify("The door creaks."),
            ClassifiedLine::new(Role::Action, "The door creaks.")
        );
    }

    #[test]
    fn title_keeps_case() {
        assert_eq!(classify("/The Long Night").text, "The Long Night");
    }

    #[test]
    fn blank_line_is_empty_action() {
        assert_eq!(classify("   \t "), ClassifiedLine::new(Role::Action, ""));
    }

    #[test]
    fn equals_marker_becomes_page_break() {
        assert_eq!(classify("=").role, Role::PageBreak);
        assert_eq!(classify("  =  ").role, Role::PageBreak);
        assert_eq!(classify("/=").role, Role::PageBreak);
        assert_eq!(classify("==").role, Role::Action);
    }

    #[test]
    fn classification_is_deterministic() {
        for raw in ["/A", ".b", "@c", "(d", "#e", "'f", "title:g", "h", "", "="] {
            assert_eq!(classify(raw), classify(raw));
        }
    }

    #[test]
    fn parse_filters_and_numbers_lines() {
        let script = parse_script(
            "title: The Heist\nauthor: Holy\n# draft\n/Opening\n\n'Hello there.\ntitle: Ignored\n",
        );
        assert_eq!(script.metadata.title.as_deref(), Some("The Heist"));
        assert_eq!(script.metadata.author.as_deref(), Some("Holy"));
        assert_eq!(
            script.lines,
            vec![
                ClassifiedLine::new(Role::Title, "Opening").at_line(4),
                ClassifiedLine::new(Role::Dialogue, "Hello there.").at_line(6),
            ]
        );
    }

    #[test]
    fn missing_metadata_gives_empty_header() {
        let script = parse_script("just action\n");
        assert_eq!(script.metadata, Metadata::default());
        assert_eq!(script.metadata.header(), "");
    }
}
