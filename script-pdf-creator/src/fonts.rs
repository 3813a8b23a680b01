//! Font management for script typography
//!
//! Registers the regular and bold faces of the selected monospace family, loads their
//! metrics with fontdue, and answers the width queries the layout engine makes.

use crate::classifier::Role;
use crate::error::{Result, ScriptError};
use fontdue::{Font, FontSettings};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Advance width of every glyph in the built-in Courier faces, in em.
pub const BUILTIN_ADVANCE_EM: f32 = 0.6;

/// The pre-registered font families a script can be set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    JetBrains,
    UbuntuMono,
    CourierPrime,
    #[default]
    CodeNewRoman,
}

impl FontFamily {
    pub const ALL: [FontFamily; 4] = [
        FontFamily::JetBrains,
        FontFamily::UbuntuMono,
        FontFamily::CourierPrime,
        FontFamily::CodeNewRoman,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FontFamily::JetBrains => "JetBrains",
            FontFamily::UbuntuMono => "UbuntuMono",
            FontFamily::CourierPrime => "CourierPrime",
            FontFamily::CodeNewRoman => "CodeNewRoman",
        }
    }

    /// File name stem of the family's TrueType files.
    fn file_stem(self) -> &'static str {
        match self {
            FontFamily::JetBrains => "JetBrainsMono",
            other => other.name(),
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FontFamily {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self> {
        FontFamily::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ScriptError::UnknownFontFamily(s.to_string()))
    }
}

/// Member of a family. Italic is registered by some families but never laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    fn suffix(self) -> &'static str {
        match self {
            FontFace::Regular => "Regular",
            FontFace::Bold => "Bold",
        }
    }

    /// Name of the face in a page's font resources.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }
}

/// A face at a size; what every drawing and measuring call is made with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutFont {
    pub face: FontFace,
    pub size: f32,
}

impl LayoutFont {
    pub const fn new(face: FontFace, size: f32) -> Self {
        Self { face, size }
    }
}

/// Reports the rendered width of a string.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font: LayoutFont) -> f32;
}

/// Fixed font choices for every kind of text on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleTable {
    pub title: LayoutFont,
    pub normal: LayoutFont,
    /// Page number, footer and running header.
    pub furniture: LayoutFont,
    pub cover_title: LayoutFont,
    pub cover_byline: LayoutFont,
    pub cover_author: LayoutFont,
}

impl Default for StyleTable {
    fn default() -> Self {
        let normal_size = 12.0;
        Self {
            title: LayoutFont::new(FontFace::Bold, 20.0),
            normal: LayoutFont::new(FontFace::Regular, normal_size),
            furniture: LayoutFont::new(FontFace::Bold, normal_size - 2.0),
            cover_title: LayoutFont::new(FontFace::Bold, 25.0),
            cover_byline: LayoutFont::new(FontFace::Regular, normal_size),
            cover_author: LayoutFont::new(FontFace::Regular, normal_size + 4.0),
        }
    }
}

impl StyleTable {
    /// Character, parenthetical and dialogue share the normal font; only margins differ.
    pub fn font_for(&self, role: Role) -> LayoutFont {
        match role {
            Role::Title => self.title,
            _ => self.normal,
        }
    }
}

#[derive(Clone)]
enum FaceSource {
    TrueType {
        font: Font,
        data: Vec<u8>,
        path: PathBuf,
    },
    BuiltinCourier,
}

/// One registered face of the selected family.
#[derive(Clone)]
pub struct LoadedFace {
    pub face: FontFace,
    /// Registered name, e.g. `JetBrains-Bold`.
    pub name: String,
    source: FaceSource,
}

impl LoadedFace {
    fn load(family: FontFamily, face: FontFace, dir: &Path) -> Result<Self> {
        let path = dir.join(format!("{}-{}.ttf", family.file_stem(), face.suffix()));
        if !path.exists() {
            log::warn!(
                "{} not found, using built-in Courier metrics for {} {}",
                path.display(),
                family,
                face.suffix()
            );
            return Ok(Self::builtin(family, face));
        }

        log::info!("Loading font {}-{} from {}", family, face.suffix(), path.display());
        let data = std::fs::read(&path).map_err(|e| ScriptError::FontLoad {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let font = Font::from_bytes(data.clone(), FontSettings::default()).map_err(|e| {
            ScriptError::FontLoad {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            face,
            name: format!("{}-{}", family, face.suffix()),
            source: FaceSource::TrueType { font, data, path },
        })
    }

    fn builtin(family: FontFamily, face: FontFace) -> Self {
        Self {
            face,
            name: format!("{}-{}", family, face.suffix()),
            source: FaceSource::BuiltinCourier,
        }
    }

    /// Raw TrueType bytes when the face was loaded from a file.
    pub fn embedded_data(&self) -> Option<&[u8]> {
        match &self.source {
            FaceSource::TrueType { data, .. } => Some(data),
            FaceSource::BuiltinCourier => None,
        }
    }

    pub fn source_path(&self) -> Option<&Path> {
        match &self.source {
            FaceSource::TrueType { path, .. } => Some(path),
            FaceSource::BuiltinCourier => None,
        }
    }

    /// Standard Type1 font standing in for a face with no file.
    pub fn builtin_base_font(&self) -> &'static str {
        match self.face {
            FontFace::Regular => "Courier",
            FontFace::Bold => "Courier-Bold",
        }
    }

    pub fn char_width(&self, ch: char, size: f32) -> f32 {
        match &self.source {
            FaceSource::TrueType { font, .. } => font.metrics(ch, size).advance_width,
            FaceSource::BuiltinCourier => BUILTIN_ADVANCE_EM * size,
        }
    }

    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, size)).sum()
    }

    /// Ascent and descent in thousandths of an em.
    pub fn vertical_metrics(&self) -> (f32, f32) {
        match &self.source {
            FaceSource::TrueType { font, .. } => font
                .horizontal_line_metrics(1000.0)
                .map(|m| (m.ascent, m.descent))
                .unwrap_or((800.0, -200.0)),
            FaceSource::BuiltinCourier => (629.0, -157.0),
        }
    }
}

/// The registered faces of the family chosen for the run.
#[derive(Clone)]
pub struct FontBook {
    family: FontFamily,
    regular: LoadedFace,
    bold: LoadedFace,
}

impl FontBook {
    /// Register the family's faces from `dir`, falling back to built-in metrics per face.
    pub fn load(family: FontFamily, dir: &Path) -> Result<Self> {
        Ok(Self {
            family,
            regular: LoadedFace::load(family, FontFace::Regular, dir)?,
            bold: LoadedFace::load(family, FontFace::Bold, dir)?,
        })
    }

    /// A font book that never touches the filesystem.
    pub fn builtin(family: FontFamily) -> Self {
        Self {
            family,
            regular: LoadedFace::builtin(family, FontFace::Regular),
            bold: LoadedFace::builtin(family, FontFace::Bold),
        }
    }

    pub fn family(&self) -> FontFamily {
        self.family
    }

    pub fn face(&self, face: FontFace) -> &LoadedFace {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        }
    }

    pub fn faces(&self) -> impl Iterator<Item = &LoadedFace> {
        [&self.regular, &self.bold].into_iter()
    }
}

impl TextMeasure for FontBook {
    fn text_width(&self, text: &str, font: LayoutFont) -> f32 {
        self.face(font.face).text_width(text, font.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_names_parse_case_insensitively() {
        assert_eq!("jetbrains".parse::<FontFamily>().unwrap(), FontFamily::JetBrains);
        assert_eq!("CourierPrime".parse::<FontFamily>().unwrap(), FontFamily::CourierPrime);
        assert_eq!(FontFamily::default(), FontFamily::CodeNewRoman);
    }

    #[test]
    fn unknown_family_is_rejected() {
        let err = "ComicSans".parse::<FontFamily>().unwrap_err();
        assert!(matches!(err, ScriptError::UnknownFontFamily(ref name) if name == "ComicSans"));
    }

    #[test]
    fn builtin_faces_are_fixed_pitch() {
        let book = FontBook::builtin(FontFamily::UbuntuMono);
        let normal = LayoutFont::new(FontFace::Regular, 12.0);
        let width = book.text_width("abcde", normal);
        assert!((width - 5.0 * 0.6 * 12.0).abs() < 1e-4);
        assert_eq!(book.face(FontFace::Bold).name, "UbuntuMono-Bold");
        assert!(book.face(FontFace::Bold).embedded_data().is_none());
    }

    #[test]
    fn missing_files_fall_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let book = FontBook::load(FontFamily::JetBrains, dir.path()).unwrap();
        assert!(book.faces().all(|f| f.source_path().is_none()));
        assert_eq!(book.face(FontFace::Regular).builtin_base_font(), "Courier");
    }

    #[test]
    fn unparsable_font_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("CourierPrime-Regular.ttf"), b"not a font").unwrap();

        let err = FontBook::load(FontFamily::CourierPrime, dir.path()).err().unwrap();
        assert!(matches!(err, ScriptError::FontLoad { .. }));
    }

    #[test]
    fn title_role_uses_title_font() {
        let styles = StyleTable::default();
        assert_eq!(styles.font_for(Role::Title), styles.title);
        assert_eq!(styles.font_for(Role::Dialogue), styles.normal);
        assert_eq!(styles.furniture.size, 10.0);
    }
}
