use crate::{
    layout::LayoutCatalog,
    theme::Theme,
    xml::{Element, Namespaces},
};
use std::path::Path;
use tempfile::TempDir;

pub(crate) mod builder;
pub(crate) mod slide;

pub use builder::{BuildError, PresentationBuilder};

/// A media file embedded in a presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaEntry {
    /// The path within the package, e.g. `media/image1.png`.
    pub path: String,

    pub media_type: &'static str,
}

/// A built presentation, ready to be packaged.
pub struct Presentation {
    theme: Theme,
    catalog: LayoutCatalog,
    namespaces: Namespaces,
    scratch: TempDir,
    slides: Vec<Element>,
    styles: Vec<Element>,
    media: Vec<MediaEntry>,
}

impl Presentation {
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn catalog(&self) -> &LayoutCatalog {
        &self.catalog
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// The slides, in order.
    pub fn slides(&self) -> &[Element] {
        &self.slides
    }

    /// The styles generated while building slides, in creation order.
    pub fn styles(&self) -> &[Element] {
        &self.styles
    }

    pub fn media(&self) -> &[MediaEntry] {
        &self.media
    }

    /// The directory media files are staged in.
    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }

    /// Consume this presentation and return its scratch directory.
    pub fn into_scratch(self) -> TempDir {
        self.scratch
    }
}
