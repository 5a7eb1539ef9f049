use crate::{
    package::parts::{self, MIME_TYPE},
    presentation::Presentation,
    xml::{NamespaceError, SerializeError, SerializeOptions},
};
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};
use zip::{result::ZipError, write::SimpleFileOptions, CompressionMethod, ZipWriter};

const MIME_TYPE_PATH: &str = "mimetype";
const MANIFEST_PATH: &str = "META-INF/manifest.xml";
const CONTENT_PATH: &str = "content.xml";
const STYLES_PATH: &str = "styles.xml";
const META_PATH: &str = "meta.xml";

/// Options that control how a package is written.
#[derive(Clone, Debug, Default)]
pub struct PackageOptions {
    /// Indent every XML part.
    pub indent: bool,

    /// Keep the staged package contents around after writing.
    pub keep_intermediate: bool,
}

/// Writes presentations as zip packages.
pub struct PackageWriter {
    options: PackageOptions,
}

impl PackageWriter {
    pub fn new(options: PackageOptions) -> Self {
        Self { options }
    }

    /// Write a presentation into a package at the given path.
    ///
    /// Every part is first staged in the presentation's scratch directory. If intermediate files
    /// are being kept, the path to that directory is returned.
    pub fn write(&self, presentation: Presentation, output: &Path) -> Result<Option<PathBuf>, WriteError> {
        let result = self.stage(&presentation).and_then(|entries| Self::archive(presentation.scratch_path(), &entries, output));
        let kept = match self.options.keep_intermediate {
            true => {
                let path = presentation.into_scratch().keep();
                log::info!("intermediate files kept in {}", path.display());
                Some(path)
            }
            false => None,
        };
        result.map(|_| kept)
    }

    fn stage(&self, presentation: &Presentation) -> Result<Vec<String>, WriteError> {
        let namespaces = presentation.namespaces();
        let options = SerializeOptions { indent: self.options.indent };
        let documents = [
            (MANIFEST_PATH, parts::manifest(namespaces, presentation.media())?),
            (CONTENT_PATH, parts::content(presentation)?),
            (STYLES_PATH, parts::styles(presentation)?),
            (META_PATH, parts::meta(namespaces)?),
        ];

        let scratch = presentation.scratch_path();
        fs::write(scratch.join(MIME_TYPE_PATH), MIME_TYPE)?;
        let mut entries = vec![MIME_TYPE_PATH.to_string()];
        for (path, document) in documents {
            let contents = document.to_document(namespaces, &options)?;
            let staged = scratch.join(path);
            if let Some(parent) = staged.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(staged, contents)?;
            entries.push(path.to_string());
        }
        entries.extend(presentation.media().iter().map(|entry| entry.path.clone()));
        Ok(entries)
    }

    fn archive(scratch: &Path, entries: &[String], output: &Path) -> Result<(), WriteError> {
        let file = File::create(output)?;
        let mut zip = ZipWriter::new(file);
        for entry in entries {
            // The mime type must be the first entry and must not be compressed.
            let method = match entry.as_str() {
                MIME_TYPE_PATH => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);
            zip.start_file(entry.as_str(), options)?;
            zip.write_all(&fs::read(scratch.join(entry))?)?;
        }
        zip.finish()?;
        log::debug!("wrote {} entries to {}", entries.len(), output.display());
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("zip: {0}")]
    Zip(#[from] ZipError),

    #[error("serializing: {0}")]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Namespace(#[from] NamespaceError),
}
