use super::{color::Color, token::TokenKind};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, io, path::Path};
use syntect::{
    highlighting::{FontStyle, Theme as SyntectTheme, ThemeSet},
    LoadingError,
};

include!(concat!(env!("OUT_DIR"), "/palettes.rs"));

static SYNTECT_THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// A syntax palette: a table of token kinds to style hints.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Palette {
    /// The page background color.
    #[serde(default)]
    pub background: Option<Color>,

    /// The background color for highlighted lines.
    #[serde(default)]
    pub highlight: Option<Color>,

    /// The default text color.
    #[serde(default)]
    pub foreground: Option<Color>,

    /// The style for every token kind, e.g. `bold italic #ff0000`.
    #[serde(default)]
    pub styles: BTreeMap<TokenKind, String>,
}

impl Palette {
    pub(crate) fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadPaletteError> {
        let contents = fs::read_to_string(&path)?;
        let palette = serde_yaml::from_str(&contents)
            .map_err(|e| LoadPaletteError::Corrupted(path.as_ref().display().to_string(), e.into()))?;
        Ok(palette)
    }
}

impl From<&SyntectTheme> for Palette {
    fn from(theme: &SyntectTheme) -> Self {
        let mut styles = BTreeMap::new();
        for item in &theme.scopes {
            let mut parts = Vec::new();
            if let Some(font_style) = item.style.font_style {
                for (flag, name) in
                    [(FontStyle::BOLD, "bold"), (FontStyle::ITALIC, "italic"), (FontStyle::UNDERLINE, "underline")]
                {
                    if font_style.contains(flag) {
                        parts.push(name.to_string());
                    }
                }
            }
            if let Some(color) = item.style.foreground {
                parts.push(Color::from(color).to_string());
            }
            let style = parts.join(" ");
            for selector in &item.scope.selectors {
                // Only plain "a.b.c" selectors map onto a token kind.
                let [scope] = selector.path.as_slice() else {
                    continue;
                };
                if !selector.excludes.is_empty() {
                    continue;
                }
                let kind: TokenKind = scope.build_string().parse().unwrap_or_default();
                styles.insert(kind, style.clone());
            }
        }
        let settings = &theme.settings;
        Self {
            background: settings.background.map(Color::from),
            highlight: settings.line_highlight.map(Color::from),
            foreground: settings.foreground.map(Color::from),
            styles,
        }
    }
}

/// The set of palettes that can be looked up by name.
#[derive(Default)]
pub struct PaletteRegistry {
    custom_palettes: BTreeMap<String, Palette>,
}

impl PaletteRegistry {
    /// Loads a palette from its name.
    ///
    /// Custom palettes take precedence over built in ones.
    pub fn load_by_name(&self, name: &str) -> Option<Palette> {
        if let Some(palette) = self.custom_palettes.get(name) {
            return Some(palette.clone());
        }
        if let Some(contents) = PALETTES.get(name) {
            // This is going to be caught by the test down here.
            let palette = serde_yaml::from_slice(contents).expect("corrupted palette");
            return Some(palette);
        }
        SYNTECT_THEMES.themes.get(name).map(Palette::from)
    }

    /// Register all the palettes in the given directory.
    ///
    /// Both `.yaml` palettes and `.tmTheme` syntect themes are loaded.
    pub fn register_from_directory<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadPaletteError> {
        let handle = match fs::read_dir(&path) {
            Ok(handle) => handle,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for entry in handle {
            let entry = entry?;
            let metadata = entry.metadata()?;
            let Some(file_name) = entry.file_name().to_str().map(ToOwned::to_owned) else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let (name, palette) = if let Some(name) = file_name.strip_suffix(".yaml") {
                (name, Palette::from_path(entry.path())?)
            } else if let Some(name) = file_name.strip_suffix(".tmTheme") {
                let theme = ThemeSet::get_theme(entry.path())
                    .map_err(|e| LoadPaletteError::Syntect(file_name.clone(), e))?;
                (name, Palette::from(&theme))
            } else {
                continue;
            };
            if PALETTES.contains_key(name) || self.custom_palettes.contains_key(name) {
                return Err(LoadPaletteError::Duplicate(name.into()));
            }
            log::debug!("registered custom palette '{name}'");
            self.custom_palettes.insert(name.into(), palette);
        }
        Ok(())
    }

    /// Get all the registered palette names.
    pub fn palette_names(&self) -> Vec<String> {
        let builtin = PALETTES.keys().map(|name| name.to_string());
        let syntect = SYNTECT_THEMES.themes.keys().cloned();
        let mut names: Vec<_> = self.custom_palettes.keys().cloned().chain(builtin).chain(syntect).collect();
        names.sort();
        names.dedup();
        names
    }
}

/// An error loading a palette.
#[derive(thiserror::Error, Debug)]
pub enum LoadPaletteError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("palette '{0}' is corrupted: {1}")]
    Corrupted(String, Box<dyn std::error::Error + Send + Sync>),

    #[error("palette '{0}' could not be loaded: {1}")]
    Syntect(String, LoadingError),

    #[error("duplicate custom palette '{0}'")]
    Duplicate(String),
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn validate_palettes() {
        let palettes = PaletteRegistry::default();
        for name in PALETTES.keys() {
            let Some(palette) = palettes.load_by_name(name) else {
                panic!("palette '{name}' is corrupted");
            };
            assert!(palette.background.is_some(), "palette '{name}' has no background");
            assert!(!palette.styles.is_empty(), "palette '{name}' has no styles");
        }
    }

    #[test]
    fn syntect_theme_conversion() {
        let palette = PaletteRegistry::default().load_by_name("base16-ocean.dark").expect("theme not found");
        assert!(palette.background.is_some());
        assert!(palette.styles.contains_key(&"comment".parse().unwrap()));
    }

    #[test]
    fn unknown_palette() {
        assert!(PaletteRegistry::default().load_by_name("potato").is_none());
    }

    #[test]
    fn load_custom() {
        let directory = tempdir().expect("creating tempdir");
        let palette = Palette {
            background: Some(Color::new(1, 2, 3)),
            styles: BTreeMap::from([("string".parse().unwrap(), "bold #fff".into())]),
            ..Default::default()
        };
        let contents = serde_yaml::to_string(&palette).expect("serialize failed");
        fs::write(directory.path().join("potato.yaml"), contents).expect("writing palette");
        fs::write(directory.path().join("ignored.txt"), "hi").expect("writing file");

        let mut palettes = PaletteRegistry::default();
        palettes.register_from_directory(directory.path()).expect("loading palettes");
        assert_eq!(palettes.load_by_name("potato"), Some(palette));
        assert!(palettes.palette_names().contains(&"potato".to_string()));
        assert!(palettes.palette_names().contains(&"default".to_string()));
    }

    #[test]
    fn duplicate_custom() {
        let directory = tempdir().expect("creating tempdir");
        fs::write(directory.path().join("default.yaml"), "styles: {}").expect("writing palette");
        let mut palettes = PaletteRegistry::default();
        let result = palettes.register_from_directory(directory.path());
        assert!(matches!(result, Err(LoadPaletteError::Duplicate(_))));
    }

    #[test]
    fn missing_directory() {
        let mut palettes = PaletteRegistry::default();
        palettes.register_from_directory("/tmp/this/does/not/exist/i/hope").expect("loading failed");
    }
}
