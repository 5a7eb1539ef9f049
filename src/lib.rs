//! Presentrs: turn notebooks and source files into syntax highlighted OpenDocument slides.
//!
//! This is not meant to be used as a crate!

pub(crate) mod config;
pub(crate) mod export;
pub(crate) mod layout;
pub(crate) mod markdown;
pub(crate) mod names;
pub(crate) mod package;
pub(crate) mod presentation;
pub(crate) mod source;
pub(crate) mod theme;
pub(crate) mod utils;
pub(crate) mod xml;

pub use crate::{
    config::{Config, ConfigLoadError},
    export::{ExportError, ExportOptions, ExportSummary, Exporter},
    package::PackageOptions,
    theme::{FontSettings, LoadPaletteError, PageMetrics, PaletteRegistry},
};
