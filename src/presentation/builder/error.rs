use crate::{
    layout::{LayoutKind, RegionName},
    markdown::ParseError,
    source::TableParseError,
    xml::NamespaceError,
};
use std::io;

/// An error when building a presentation.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("invalid table: {0}")]
    Table(#[from] TableParseError),

    #[error("invalid base64 image: {0}")]
    DecodeImage(#[from] base64::DecodeError),

    #[error("invalid image: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid markdown: {0}")]
    Markdown(#[from] ParseError),

    #[error("writing media: {0}")]
    Io(#[from] io::Error),

    #[error("layout {layout} has no {region} region")]
    MissingRegion { layout: LayoutKind, region: RegionName },

    #[error(transparent)]
    Namespace(#[from] NamespaceError),
}
