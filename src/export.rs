use crate::{
    package::{PackageOptions, PackageWriter, WriteError},
    presentation::{BuildError, PresentationBuilder},
    source::{load_units, LoadSourceError, SourceOptions},
    theme::{FontSettings, PageMetrics, PaletteRegistry, Theme},
    xml::Namespaces,
};
use std::{
    io,
    path::{Path, PathBuf},
};

/// Options for a single conversion.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// The name of the palette to style slides with.
    pub palette: String,

    /// Whether to include code cell outputs.
    pub include_outputs: bool,

    pub page: PageMetrics,
    pub fonts: FontSettings,
    pub package: PackageOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            palette: crate::config::DEFAULT_PALETTE.into(),
            include_outputs: false,
            page: Default::default(),
            fonts: Default::default(),
            package: Default::default(),
        }
    }
}

/// The result of a conversion.
#[derive(Clone, Debug)]
pub struct ExportSummary {
    /// The path the package was written to.
    pub output: PathBuf,

    pub slides: usize,

    /// The staged package contents, if they were kept.
    pub intermediate: Option<PathBuf>,
}

/// Converts notebooks and source files into presentations.
pub struct Exporter<'a> {
    palettes: &'a PaletteRegistry,
    options: ExportOptions,
}

impl<'a> Exporter<'a> {
    pub fn new(palettes: &'a PaletteRegistry, options: ExportOptions) -> Self {
        Self { palettes, options }
    }

    /// Convert the file at `input` and write it into `output`.
    ///
    /// If `output` is a directory the package is written inside it, named after the input file.
    pub fn export(&self, input: &Path, output: &Path) -> Result<ExportSummary, ExportError> {
        let palette = self.palettes.load_by_name(&self.options.palette).ok_or_else(|| {
            ExportError::InvalidPalette(self.options.palette.clone(), self.palettes.palette_names().join(", "))
        })?;
        log::info!("using palette '{}'", self.options.palette);
        let theme = Theme::new(&self.options.palette, &palette, self.options.page.clone(), self.options.fonts.clone());

        let source_options = SourceOptions { include_outputs: self.options.include_outputs };
        let units = load_units(input, &source_options)?;
        let mut builder = PresentationBuilder::new(theme, Namespaces::odf()).map_err(ExportError::Scratch)?;
        for (index, unit) in units.iter().enumerate() {
            builder.push_unit(unit).map_err(|source| ExportError::Build { index, source })?;
        }
        let slides = builder.slide_count();
        let presentation = builder.build();

        let output = Self::output_path(input, output);
        let intermediate = PackageWriter::new(self.options.package.clone()).write(presentation, &output)?;
        log::info!("wrote {slides} slides to {}", output.display());
        Ok(ExportSummary { output, slides, intermediate })
    }

    fn output_path(input: &Path, output: &Path) -> PathBuf {
        if !output.is_dir() {
            return output.into();
        }
        let stem = input.file_stem().unwrap_or(input.as_os_str());
        output.join(format!("{}.odp", stem.to_string_lossy()))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("invalid palette '{0}', valid palettes are: {1}")]
    InvalidPalette(String, String),

    #[error("loading input: {0}")]
    Load(#[from] LoadSourceError),

    #[error("creating scratch directory: {0}")]
    Scratch(io::Error),

    #[error("unit {index}: {source}")]
    Build { index: usize, source: BuildError },

    #[error("writing package: {0}")]
    Write(#[from] WriteError),
}
