//! Presentation styling derived from a syntax palette.

use crate::xml::{Element, NamespaceError, Namespaces};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub(crate) mod color;
pub(crate) mod palette;
pub(crate) mod token;

pub use color::{Color, ParseColorError};
pub use palette::{LoadPaletteError, Palette, PaletteRegistry};
pub use token::TokenKind;

// The token kinds tried, in order, when picking the title and content colors.
const TITLE_COLOR_KINDS: &[&str] = &["string", "constant", "comment"];
const CONTENT_COLOR_KINDS: &[&str] = &["comment", "string", "constant"];

const FALLBACK_LIGHTNESS_SHIFT: f64 = 0.5;
const HIGHLIGHT_LIGHTNESS_SHIFT: f64 = 0.1;
const BANDING_LIGHTNESS_SHIFT: f64 = 0.05;
const TABLE_BORDER_WIDTH: f64 = 0.03;

/// The size of a page, in inches.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct PageMetrics {
    /// The page width.
    #[serde(default = "default_page_width")]
    pub width: f64,

    /// The page height.
    #[serde(default = "default_page_height")]
    pub height: f64,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self { width: default_page_width(), height: default_page_height() }
    }
}

fn default_page_width() -> f64 {
    13.33
}

fn default_page_height() -> f64 {
    7.5
}

/// The fonts used in a presentation.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct FontSettings {
    /// The font size for slide titles, in points.
    #[serde(default = "default_title_size")]
    pub title_size: u32,

    /// The font size for slide content, in points.
    #[serde(default = "default_content_size")]
    pub content_size: u32,

    /// The font size for code, in points.
    #[serde(default = "default_code_size")]
    pub code_size: u32,

    /// The font family for code.
    #[serde(default = "default_code_family")]
    pub code_family: String,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            title_size: default_title_size(),
            content_size: default_content_size(),
            code_size: default_code_size(),
            code_family: default_code_family(),
        }
    }
}

fn default_title_size() -> u32 {
    44
}

fn default_content_size() -> u32 {
    28
}

fn default_code_size() -> u32 {
    18
}

fn default_code_family() -> String {
    "Liberation Mono".into()
}

/// The text style for a token kind.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenStyle {
    name: String,
    color: Option<Color>,
    bold: bool,
    italic: bool,
    underline: bool,
}

impl TokenStyle {
    /// Parse a style string like `bold italic #ff0000`.
    ///
    /// Returns `None` if the string has no tokens at all.
    fn parse(name: String, input: &str) -> Option<Self> {
        let mut parts = input.split_whitespace().peekable();
        parts.peek()?;
        let mut style = Self { name, color: None, bold: false, italic: false, underline: false };
        for part in parts {
            match part {
                "bold" => style.bold = true,
                "italic" => style.italic = true,
                "underline" => style.underline = true,
                color if color.starts_with('#') && style.color.is_none() => match color.parse() {
                    Ok(color) => style.color = Some(color),
                    Err(e) => log::warn!("ignoring color in style '{input}': {e}"),
                },
                _ => (),
            };
        }
        Some(style)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Build the `style:style` element for this style.
    pub fn to_element(&self, namespaces: &Namespaces) -> Result<Element, NamespaceError> {
        let mut style =
            Element::with_attributes(namespaces, "style:style", [("style:family", "text"), ("style:name", self.name.as_str())])?;
        let mut properties = Element::new(namespaces, "style:text-properties")?;
        if let Some(color) = &self.color {
            properties.set_attribute(namespaces, "fo:color", color.to_string())?;
        }
        if self.bold {
            properties.set_attribute(namespaces, "fo:font-weight", "bold")?;
        }
        if self.italic {
            properties.set_attribute(namespaces, "fo:font-style", "italic")?;
        }
        if self.underline {
            properties.set_attribute(namespaces, "style:text-underline-style", "solid")?;
        }
        style.append(properties);
        Ok(style)
    }
}

/// The styling for a presentation.
///
/// This is derived once from a palette and never changes afterwards.
#[derive(Clone, Debug)]
pub struct Theme {
    background: Color,
    highlight: Color,
    title: Color,
    content: Color,
    content_alt: Color,
    odd_row: Color,
    even_row: Color,
    page: PageMetrics,
    fonts: FontSettings,
    token_styles: BTreeMap<TokenKind, TokenStyle>,
}

impl Theme {
    pub fn new(palette_name: &str, palette: &Palette, page: PageMetrics, fonts: FontSettings) -> Self {
        let background = palette.background.unwrap_or(Color::WHITE);
        let fallback = background.contrasting(FALLBACK_LIGHTNESS_SHIFT);

        let mut token_styles = BTreeMap::new();
        for (kind, raw_style) in &palette.styles {
            let name = token_style_name(palette_name, kind);
            match TokenStyle::parse(name, raw_style) {
                Some(style) => {
                    token_styles.insert(kind.clone(), style);
                }
                None => log::debug!("ignoring token kind '{kind}' with no style"),
            };
        }
        // The root kind must always resolve to something so every token ends up styled.
        let root = token_styles.entry(TokenKind::root()).or_insert_with(|| TokenStyle {
            name: token_style_name(palette_name, &TokenKind::root()),
            color: None,
            bold: false,
            italic: false,
            underline: false,
        });
        let content_alt = *root.color.get_or_insert(palette.foreground.unwrap_or(fallback));

        let pick_color = |candidates: &[&str]| {
            candidates
                .iter()
                .filter_map(|kind| token_styles.get(&TokenKind::new(kind.split('.'))))
                .find_map(TokenStyle::color)
                .unwrap_or(fallback)
        };
        let title = pick_color(TITLE_COLOR_KINDS);
        let content = pick_color(CONTENT_COLOR_KINDS);
        Self {
            background,
            highlight: palette.highlight.unwrap_or_else(|| background.contrasting(HIGHLIGHT_LIGHTNESS_SHIFT)),
            title,
            content,
            content_alt,
            odd_row: background.shift_lightness(BANDING_LIGHTNESS_SHIFT),
            even_row: background.shift_lightness(-BANDING_LIGHTNESS_SHIFT),
            page,
            fonts,
            token_styles,
        }
    }

    /// The text style elements for every token kind, root kind first.
    pub fn styles(&self, namespaces: &Namespaces) -> Result<Vec<Element>, NamespaceError> {
        self.token_styles.values().map(|style| style.to_element(namespaces)).collect()
    }

    /// Find the style name for a token.
    ///
    /// The token's own kind and its parents are tried first, then each of the enclosing kinds and
    /// their parents, innermost first. The root kind's style is used when nothing else matches.
    pub fn resolve_token_style(&self, kind: &TokenKind, enclosing: &[TokenKind]) -> &str {
        let candidates = std::iter::once(kind).chain(enclosing.iter().rev());
        for candidate in candidates {
            for ancestor in candidate.ancestors().filter(|ancestor| !ancestor.is_root()) {
                if let Some(style) = self.token_styles.get(&ancestor) {
                    return &style.name;
                }
            }
        }
        self.root_style().name()
    }

    fn root_style(&self) -> &TokenStyle {
        // `new` always inserts the root style.
        &self.token_styles[&TokenKind::root()]
    }

    pub fn background_color(&self) -> Color {
        self.background
    }

    pub fn highlight_color(&self) -> Color {
        self.highlight
    }

    pub fn title_color(&self) -> Color {
        self.title
    }

    pub fn content_color(&self) -> Color {
        self.content
    }

    pub fn content_alt_color(&self) -> Color {
        self.content_alt
    }

    pub fn table_row_odd_color(&self) -> Color {
        self.odd_row
    }

    pub fn table_row_even_color(&self) -> Color {
        self.even_row
    }

    pub fn table_border_width(&self) -> String {
        format!("{TABLE_BORDER_WIDTH}in")
    }

    pub fn page(&self) -> &PageMetrics {
        &self.page
    }

    pub fn fonts(&self) -> &FontSettings {
        &self.fonts
    }

    pub fn title_font_size(&self) -> String {
        font_size(self.fonts.title_size)
    }

    pub fn content_font_size(&self) -> String {
        font_size(self.fonts.content_size)
    }

    pub fn code_font_size(&self) -> String {
        font_size(self.fonts.code_size)
    }
}

fn font_size(points: u32) -> String {
    format!("{points}pt")
}

fn token_style_name(palette_name: &str, kind: &TokenKind) -> String {
    crate::utils::style_name(&format!("span__{palette_name}__{}", kind.style_suffix()))
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn palette(styles: &[(&str, &str)]) -> Palette {
        Palette {
            background: Some(Color::new(0xf8, 0xf8, 0xf8)),
            highlight: Some(Color::new(0xff, 0xff, 0xcc)),
            foreground: None,
            styles: styles.iter().map(|(kind, style)| (kind.parse().unwrap(), style.to_string())).collect(),
        }
    }

    fn theme(styles: &[(&str, &str)]) -> Theme {
        Theme::new("test", &palette(styles), Default::default(), Default::default())
    }

    fn kind(input: &str) -> TokenKind {
        input.parse().unwrap()
    }

    #[test]
    fn token_style_element() {
        let theme = theme(&[("keyword", "bold italic underline #008000")]);
        let namespaces = Namespaces::odf();
        let styles = theme.styles(&namespaces).expect("styles failed");
        let serialized: Vec<_> = styles.iter().map(|s| s.serialize(&Default::default()).unwrap()).collect();
        assert_eq!(serialized.len(), 2);
        assert_eq!(
            serialized[1],
            r##"<style:style style:family="text" style:name="span__test__keyword"><style:text-properties fo:color="#008000" fo:font-weight="bold" fo:font-style="italic" style:text-underline-style="solid"/></style:style>"##
        );
    }

    #[test]
    fn short_colors_expanded() {
        let theme = theme(&[("string", "#fff")]);
        assert_eq!(theme.title_color().to_string(), "#ffffff");
    }

    #[test]
    fn empty_styles_skipped() {
        let theme = theme(&[("keyword", ""), ("string", "  ")]);
        assert_eq!(theme.resolve_token_style(&kind("keyword"), &[]), "span__test__token");
        assert_eq!(theme.styles(&Namespaces::odf()).unwrap().len(), 1);
    }

    #[rstest]
    #[case::exact("keyword.operator", &[], "span__test__keyword_operator")]
    #[case::parent("keyword.control.flow", &[], "span__test__keyword")]
    #[case::enclosing("punctuation.definition", &["source.python", "string.quoted"], "span__test__string")]
    #[case::innermost_enclosing_first(
        "punctuation",
        &["string.quoted", "keyword.other"],
        "span__test__keyword"
    )]
    #[case::root("meta.something", &["source.python"], "span__test__token")]
    fn resolution(#[case] token: &str, #[case] enclosing: &[&str], #[case] expected: &str) {
        let theme = theme(&[("keyword", "bold"), ("keyword.operator", "#666"), ("string", "#ba2121")]);
        let enclosing: Vec<_> = enclosing.iter().map(|k| kind(k)).collect();
        assert_eq!(theme.resolve_token_style(&kind(token), &enclosing), expected);
    }

    #[test]
    fn color_candidates() {
        let theme = theme(&[("comment", "italic #3d7b7b"), ("string", "#ba2121"), ("token", "#111")]);
        assert_eq!(theme.title_color().to_string(), "#ba2121");
        assert_eq!(theme.content_color().to_string(), "#3d7b7b");
        assert_eq!(theme.content_alt_color().to_string(), "#111111");
    }

    #[test]
    fn candidate_without_color_is_skipped() {
        let theme = theme(&[("string", "bold"), ("constant", "#880000")]);
        assert_eq!(theme.title_color().to_string(), "#880000");
    }

    #[rstest]
    #[case::light("#ffffff")]
    #[case::dark("#272822")]
    #[case::mid("#808080")]
    fn fallback_color(#[case] background: &str) {
        let palette = Palette {
            background: Some(background.parse().unwrap()),
            styles: BTreeMap::from([(kind("keyword"), "bold #f92672".into())]),
            ..Default::default()
        };
        let theme = Theme::new("test", &palette, Default::default(), Default::default());
        let title = theme.title_color();
        assert_ne!(title, theme.background_color());
        assert_eq!(title.to_string().len(), 7);
        assert_eq!(theme.content_alt_color(), title);
    }

    #[test]
    fn banding() {
        let theme = theme(&[]);
        assert!(theme.table_row_odd_color().lightness() > theme.background_color().lightness());
        assert!(theme.table_row_even_color().lightness() < theme.background_color().lightness());
    }

    #[test]
    fn defaults() {
        let palette = Palette::default();
        let theme = Theme::new("Some Palette", &palette, Default::default(), Default::default());
        assert_eq!(theme.background_color(), Color::WHITE);
        assert_ne!(theme.highlight_color(), Color::WHITE);
        assert_eq!(theme.title_font_size(), "44pt");
        assert_eq!(theme.content_font_size(), "28pt");
        assert_eq!(theme.code_font_size(), "18pt");
        assert_eq!(theme.table_border_width(), "0.03in");
        assert_eq!(theme.resolve_token_style(&kind("string"), &[]), "span__some-palette__token");
    }

    #[test]
    fn idempotent() {
        let registry = PaletteRegistry::default();
        let namespaces = Namespaces::odf();
        let palette = registry.load_by_name("default").expect("no default palette");
        let serialize = || {
            let theme = Theme::new("default", &palette, Default::default(), Default::default());
            let styles = theme.styles(&namespaces).expect("styles failed");
            styles.iter().map(|s| s.serialize(&Default::default()).unwrap()).collect::<Vec<_>>()
        };
        let first = serialize();
        assert!(!first.is_empty());
        assert_eq!(first, serialize());
    }
}
