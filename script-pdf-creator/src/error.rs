//! Error taxonomy for script conversion.
//!
//! Every failure aborts the whole run; a half-written PDF is never a useful artifact.

use std::path::PathBuf;
use thiserror::Error;

/// Stage of the conversion in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Configuration,
    Rendering,
    Finalization,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Input => "input",
            Stage::Configuration => "configuration",
            Stage::Rendering => "rendering",
            Stage::Finalization => "finalization",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("cannot read script {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown font family '{0}' (expected one of JetBrains, UbuntuMono, CourierPrime, CodeNewRoman)")]
    UnknownFontFamily(String),

    #[error("cannot load font {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    #[error("line {line}: chapter heading '{text}' does not match the table of contents ({expected})")]
    ChapterMismatch {
        line: usize,
        text: String,
        expected: String,
    },

    #[error("{count} table of contents entries were never rendered, first is '{first}'")]
    UnrenderedChapters { count: usize, first: String },

    #[error("link target '{0}' was never bookmarked")]
    UnresolvedLink(String),

    #[error("PDF structure error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("cannot write {path}: {reason}")]
    Output { path: PathBuf, reason: String },
}

impl ScriptError {
    pub fn stage(&self) -> Stage {
        match self {
            ScriptError::Input { .. } => Stage::Input,
            ScriptError::UnknownFontFamily(_) | ScriptError::FontLoad { .. } => Stage::Configuration,
            ScriptError::ChapterMismatch { .. } | ScriptError::UnrenderedChapters { .. } => {
                Stage::Rendering
            }
            ScriptError::UnresolvedLink(_) | ScriptError::Pdf(_) | ScriptError::Output { .. } => {
                Stage::Finalization
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ScriptError>;
