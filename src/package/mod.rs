//! Packaging presentations as OpenDocument files.

pub(crate) mod parts;
pub(crate) mod writer;

pub use writer::{PackageOptions, PackageWriter, WriteError};
