//! The XML parts in a presentation package.

use crate::{
    layout::inches,
    names,
    presentation::{MediaEntry, Presentation},
    theme::Theme,
    xml::{Element, NamespaceError, Namespaces},
};

pub(crate) const MIME_TYPE: &str = "application/vnd.oasis.opendocument.presentation";
const ODF_VERSION: &str = "1.3";
const BULLET: &str = "•";

/// Build `content.xml`.
pub(crate) fn content(presentation: &Presentation) -> Result<Element, NamespaceError> {
    let ns = presentation.namespaces();
    let mut document = versioned(ns, "office:document-content")?;

    let mut automatic = Element::new(ns, "office:automatic-styles")?;
    let mut drawing_page = named_style(ns, names::DRAWING_PAGE_STYLE, "drawing-page")?;
    drawing_page.append(Element::with_attributes(
        ns,
        "style:drawing-page-properties",
        [("presentation:background-visible", "true"), ("presentation:background-objects-visible", "true")],
    )?);
    automatic.append(drawing_page);
    automatic.extend(presentation.theme().styles(ns)?);
    automatic.extend(presentation.styles().iter().cloned());
    document.append(automatic);

    let mut body = Element::new(ns, "office:body")?;
    let mut slides = Element::new(ns, "office:presentation")?;
    slides.extend(presentation.slides().iter().cloned());
    body.append(slides);
    document.append(body);
    Ok(document)
}

/// Build `styles.xml`.
pub(crate) fn styles(presentation: &Presentation) -> Result<Element, NamespaceError> {
    let ns = presentation.namespaces();
    let theme = presentation.theme();
    let mut document = versioned(ns, "office:document-styles")?;

    let mut fonts = Element::new(ns, "office:font-face-decls")?;
    let family = &theme.fonts().code_family;
    fonts.append(Element::with_attributes(
        ns,
        "style:font-face",
        [
            ("style:name", family.clone()),
            ("svg:font-family", format!("'{family}'")),
            ("style:font-pitch", "fixed".to_string()),
        ],
    )?);
    document.append(fonts);

    let mut common = Element::new(ns, "office:styles")?;
    common.extend(frame_styles(ns, theme)?);
    common.extend(paragraph_styles(ns, theme)?);
    common.extend(list_styles(ns)?);
    document.append(common);

    let mut automatic = Element::new(ns, "office:automatic-styles")?;
    let page = theme.page();
    let mut page_layout = Element::with_attributes(ns, "style:page-layout", [("style:name", names::PAGE_LAYOUT)])?;
    page_layout.append(Element::with_attributes(
        ns,
        "style:page-layout-properties",
        [
            ("fo:margin-top", "0in".to_string()),
            ("fo:margin-bottom", "0in".to_string()),
            ("fo:margin-left", "0in".to_string()),
            ("fo:margin-right", "0in".to_string()),
            ("fo:page-width", inches(page.width)),
            ("fo:page-height", inches(page.height)),
            ("style:print-orientation", "landscape".to_string()),
        ],
    )?);
    automatic.append(page_layout);
    let mut master_style = named_style(ns, names::MASTER_PAGE_STYLE, "drawing-page")?;
    master_style.append(Element::with_attributes(
        ns,
        "style:drawing-page-properties",
        [
            ("draw:fill", "solid".to_string()),
            ("draw:fill-color", theme.background_color().to_string()),
            ("draw:background-size", "full".to_string()),
        ],
    )?);
    automatic.append(master_style);
    document.append(automatic);

    let mut masters = Element::new(ns, "office:master-styles")?;
    for layout in presentation.catalog().layouts() {
        masters.append(layout.to_master_page(ns)?);
    }
    document.append(masters);
    Ok(document)
}

/// Build `meta.xml`.
pub(crate) fn meta(namespaces: &Namespaces) -> Result<Element, NamespaceError> {
    let mut document = versioned(namespaces, "office:document-meta")?;
    let mut meta = Element::new(namespaces, "office:meta")?;
    let generator = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    meta.append(Element::new(namespaces, "meta:generator")?.with_text(generator));
    document.append(meta);
    Ok(document)
}

/// Build `META-INF/manifest.xml`.
pub(crate) fn manifest(namespaces: &Namespaces, media: &[MediaEntry]) -> Result<Element, NamespaceError> {
    let mut manifest =
        Element::with_attributes(namespaces, "manifest:manifest", [("manifest:version", ODF_VERSION)])?;
    manifest.append(Element::with_attributes(
        namespaces,
        "manifest:file-entry",
        [("manifest:full-path", "/"), ("manifest:version", ODF_VERSION), ("manifest:media-type", MIME_TYPE)],
    )?);
    let parts = ["content.xml", "styles.xml", "meta.xml"].map(|path| (path, "text/xml"));
    let media = media.iter().map(|entry| (entry.path.as_str(), entry.media_type));
    for (path, media_type) in parts.into_iter().chain(media) {
        manifest.append(Element::with_attributes(
            namespaces,
            "manifest:file-entry",
            [("manifest:full-path", path), ("manifest:media-type", media_type)],
        )?);
    }
    Ok(manifest)
}

fn versioned(ns: &Namespaces, name: &str) -> Result<Element, NamespaceError> {
    Element::with_attributes(ns, name, [("office:version", ODF_VERSION)])
}

fn named_style(ns: &Namespaces, name: &str, family: &str) -> Result<Element, NamespaceError> {
    Element::with_attributes(ns, "style:style", [("style:name", name), ("style:family", family)])
}

fn text_properties(ns: &Namespaces, color: String, size: String) -> Result<Element, NamespaceError> {
    Element::with_attributes(ns, "style:text-properties", [("fo:color", color), ("fo:font-size", size)])
}

fn frame_styles(ns: &Namespaces, theme: &Theme) -> Result<Vec<Element>, NamespaceError> {
    let frames = [
        (names::TITLE_FRAME_STYLE, theme.title_color(), theme.title_font_size()),
        (names::CONTENT_FRAME_STYLE, theme.content_color(), theme.content_font_size()),
        (names::CODE_FRAME_STYLE, theme.content_alt_color(), theme.code_font_size()),
        (names::OUTPUT_FRAME_STYLE, theme.content_color(), theme.code_font_size()),
        (names::IMAGE_FRAME_STYLE, theme.content_color(), theme.content_font_size()),
        (names::OBJECT_FRAME_STYLE, theme.content_color(), theme.content_font_size()),
    ];
    let mut styles = Vec::new();
    for (name, color, size) in frames {
        let mut style = named_style(ns, name, "presentation")?;
        style.append(Element::with_attributes(
            ns,
            "style:graphic-properties",
            [("draw:stroke", "none"), ("draw:fill", "none"), ("draw:textarea-vertical-align", "top")],
        )?);
        style.append(text_properties(ns, color.to_string(), size)?);
        styles.push(style);
    }
    Ok(styles)
}

fn paragraph_styles(ns: &Namespaces, theme: &Theme) -> Result<Vec<Element>, NamespaceError> {
    let code_family = theme.fonts().code_family.as_str();
    let mut title = named_style(ns, names::TITLE_PARAGRAPH_STYLE, "paragraph")?;
    title.append(Element::with_attributes(ns, "style:paragraph-properties", [("fo:text-align", "start")])?);
    let mut title_text = text_properties(ns, theme.title_color().to_string(), theme.title_font_size())?;
    title_text.set_attribute(ns, "fo:font-weight", "bold")?;
    title.append(title_text);
    let mut styles = vec![title];
    for (name, background) in [
        (names::CODE_PARAGRAPH_STYLE, None),
        (names::CODE_HIGHLIGHT_PARAGRAPH_STYLE, Some(theme.highlight_color())),
        (names::OUTPUT_PARAGRAPH_STYLE, None),
    ] {
        let mut style = named_style(ns, name, "paragraph")?;
        let mut paragraph = Element::with_attributes(ns, "style:paragraph-properties", [("fo:margin-top", "0in"), ("fo:margin-bottom", "0in")])?;
        if let Some(color) = background {
            paragraph.set_attribute(ns, "fo:background-color", color.to_string())?;
        }
        style.append(paragraph);
        let mut text = text_properties(ns, theme.content_alt_color().to_string(), theme.code_font_size())?;
        text.set_attribute(ns, "style:font-name", code_family)?;
        style.append(text);
        styles.push(style);
    }
    for name in [names::CONTENT_PARAGRAPH_STYLE, names::CONTENT_LIST_PARAGRAPH_STYLE] {
        let mut style = named_style(ns, name, "paragraph")?;
        style.append(Element::with_attributes(ns, "style:paragraph-properties", [("fo:margin-bottom", "0.05in")])?);
        style.append(text_properties(ns, theme.content_color().to_string(), theme.content_font_size())?);
        styles.push(style);
    }
    Ok(styles)
}

fn list_styles(ns: &Namespaces) -> Result<Vec<Element>, NamespaceError> {
    let level_properties = || {
        Element::with_attributes(
            ns,
            "style:list-level-properties",
            [("text:space-before", "0.1in"), ("text:min-label-width", "0.3in")],
        )
    };

    let mut bullets = Element::with_attributes(ns, "text:list-style", [("style:name", names::BULLET_LIST_STYLE)])?;
    let mut level =
        Element::with_attributes(ns, "text:list-level-style-bullet", [("text:level", "1"), ("text:bullet-char", BULLET)])?;
    level.append(level_properties()?);
    bullets.append(level);

    let mut numbers = Element::with_attributes(ns, "text:list-style", [("style:name", names::NUMBERED_LIST_STYLE)])?;
    let mut level = Element::with_attributes(
        ns,
        "text:list-level-style-number",
        [("text:level", "1"), ("style:num-format", "1"), ("style:num-suffix", ".")],
    )?;
    level.append(level_properties()?);
    numbers.append(level);
    Ok(vec![bullets, numbers])
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::presentation::builder::test_utils::builder;
    use crate::source::SourceUnit;

    #[test]
    fn content_order() {
        let mut builder = builder();
        builder.push_unit(&SourceUnit::Markdown("**bold**".into())).expect("build failed");
        let presentation = builder.build();
        let document = content(&presentation).expect("content failed");
        let automatic = &document.children()[0];
        let names: Vec<_> = automatic.children().iter().map(|s| s.attribute("style:name").unwrap()).collect();
        assert_eq!(names.first(), Some(&"dp1"));
        assert_eq!(names.get(1), Some(&"span__default__token"));
        assert_eq!(names.last(), Some(&"span__strong"));
        let slides = document.find_all("draw:page").count();
        assert_eq!(slides, 1);
    }

    #[test]
    fn master_pages() {
        let presentation = builder().build();
        let document = styles(&presentation).expect("styles failed");
        let masters: Vec<_> =
            document.find_all("style:master-page").map(|page| page.attribute("style:name").unwrap()).collect();
        assert_eq!(masters.len(), 8);
        assert!(masters.contains(&"layout-title-code-and-output"));
        let background = document
            .find_all("style:drawing-page-properties")
            .next()
            .and_then(|properties| properties.attribute("draw:fill-color"));
        assert_eq!(background, Some(presentation.theme().background_color().to_string().as_str()));
    }

    #[test]
    fn title_paragraph_style() {
        let presentation = builder().build();
        let document = styles(&presentation).expect("styles failed");
        let style = document
            .find_all("style:style")
            .find(|style| style.attribute("style:name") == Some(names::TITLE_PARAGRAPH_STYLE))
            .expect("no title paragraph style");
        assert_eq!(style.attribute("style:family"), Some("paragraph"));
        let text = style.find_all("style:text-properties").next().expect("no text properties");
        let title_color = presentation.theme().title_color().to_string();
        assert_eq!(text.attribute("fo:color"), Some(title_color.as_str()));
        assert_eq!(text.attribute("fo:font-weight"), Some("bold"));
    }

    #[test]
    fn manifest_entries() {
        let namespaces = Namespaces::odf();
        let media = vec![MediaEntry { path: "media/image1.png".into(), media_type: "image/png" }];
        let manifest = manifest(&namespaces, &media).expect("manifest failed");
        let paths: Vec<_> = manifest.children().iter().map(|e| e.attribute("manifest:full-path").unwrap()).collect();
        assert_eq!(paths, &["/", "content.xml", "styles.xml", "meta.xml", "media/image1.png"]);
        assert_eq!(manifest.children()[4].attribute("manifest:media-type"), Some("image/png"));
    }

    #[test]
    fn generator() {
        let meta = meta(&Namespaces::odf()).expect("meta failed");
        let generator = meta.find_all("meta:generator").next().and_then(Element::text);
        assert_eq!(generator, Some(concat!("presentrs/", env!("CARGO_PKG_VERSION"))));
    }
}
