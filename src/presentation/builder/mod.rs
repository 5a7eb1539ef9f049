use crate::{
    layout::{LayoutCatalog, LayoutKind},
    names,
    presentation::{slide::SlideBuilder, MediaEntry, Presentation},
    source::SourceUnit,
    theme::Theme,
    xml::{Element, NamespaceError, Namespaces},
};
use std::{collections::HashSet, io};
use tempfile::TempDir;

pub(crate) mod error;

mod code;
mod image;
mod markdown;
mod table;

pub use error::BuildError;

pub(crate) type BuildResult = Result<(), BuildError>;

/// Everything generated while building a single unit.
///
/// This is only merged into the presentation once the whole unit was built successfully so a
/// failing unit never leaves half of its slides behind.
#[derive(Default)]
pub(crate) struct UnitBuffer {
    slides: Vec<Element>,
    styles: Vec<Element>,
    style_names: HashSet<String>,
    media: Vec<MediaEntry>,
    tables: usize,
}

/// Builds a presentation one source unit at a time.
pub struct PresentationBuilder {
    theme: Theme,
    catalog: LayoutCatalog,
    namespaces: Namespaces,
    scratch: TempDir,
    slides: Vec<Element>,
    styles: Vec<Element>,
    style_names: HashSet<String>,
    media: Vec<MediaEntry>,
    tables: usize,
}

impl PresentationBuilder {
    /// Construct a new builder.
    ///
    /// This creates the scratch directory media files are staged in.
    pub fn new(theme: Theme, namespaces: Namespaces) -> io::Result<Self> {
        let scratch = TempDir::with_suffix("presentrs")?;
        let catalog = LayoutCatalog::new(theme.page());
        Ok(Self {
            theme,
            catalog,
            namespaces,
            scratch,
            slides: Vec::new(),
            styles: Vec::new(),
            style_names: HashSet::new(),
            media: Vec::new(),
            tables: 0,
        })
    }

    /// Turn a unit into slides and append them to the presentation.
    pub fn push_unit(&mut self, unit: &SourceUnit) -> BuildResult {
        let mut buffer = UnitBuffer::default();
        match unit {
            SourceUnit::Code(record) => self.push_code(record, &mut buffer)?,
            SourceUnit::Markdown(text) => self.push_markdown(text, &mut buffer)?,
        };
        self.commit(buffer);
        Ok(())
    }

    /// Get the number of slides built so far.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn build(self) -> Presentation {
        Presentation {
            theme: self.theme,
            catalog: self.catalog,
            namespaces: self.namespaces,
            scratch: self.scratch,
            slides: self.slides,
            styles: self.styles,
            media: self.media,
        }
    }

    fn commit(&mut self, buffer: UnitBuffer) {
        let UnitBuffer { slides, styles, style_names, media, tables } = buffer;
        log::debug!("adding {} slides and {} styles", slides.len(), styles.len());
        self.slides.extend(slides);
        self.styles.extend(styles);
        self.style_names.extend(style_names);
        self.media.extend(media);
        self.tables += tables;
    }

    fn new_slide(&self, kind: LayoutKind) -> SlideBuilder<'_> {
        SlideBuilder::new(self.catalog.get(kind), &self.namespaces)
    }

    fn finish_slide(&self, slide: SlideBuilder<'_>, buffer: &mut UnitBuffer) -> BuildResult {
        let name = format!("slide{}", self.slides.len() + buffer.slides.len() + 1);
        let page = slide.build(&name)?;
        buffer.slides.push(page);
        Ok(())
    }

    fn has_style(&self, name: &str, buffer: &UnitBuffer) -> bool {
        self.style_names.contains(name) || buffer.style_names.contains(name)
    }

    fn element(&self, name: &str) -> Result<Element, NamespaceError> {
        Element::new(&self.namespaces, name)
    }

    fn paragraph(&self, style: &str) -> Result<Element, NamespaceError> {
        Element::with_attributes(&self.namespaces, "text:p", [("text:style-name", style)])
    }

    fn title_paragraph(&self, title: &str) -> Result<Element, NamespaceError> {
        Ok(self.paragraph(names::TITLE_PARAGRAPH_STYLE)?.with_text(title))
    }
}
