use serde::Deserialize;
use serde_json::Value;
use std::{collections::BTreeMap, fs, io, path::Path};

/// A notebook file.
#[derive(Debug, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,

    #[serde(default)]
    pub metadata: NotebookMetadata,
}

impl Notebook {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, NotebookError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, NotebookError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// The language the notebook's code cells are written in.
    pub fn language(&self) -> &str {
        let metadata = &self.metadata;
        metadata
            .kernelspec
            .as_ref()
            .and_then(|spec| spec.language.as_deref())
            .or_else(|| metadata.language_info.as_ref().and_then(|info| info.name.as_deref()))
            .unwrap_or("python")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default)]
    pub kernelspec: Option<KernelSpec>,

    #[serde(default)]
    pub language_info: Option<LanguageInfo>,
}

#[derive(Debug, Deserialize)]
pub struct KernelSpec {
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageInfo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "cell_type", rename_all = "snake_case")]
pub enum Cell {
    Code {
        source: MultilineText,

        #[serde(default)]
        outputs: Vec<Output>,
    },
    Markdown {
        source: MultilineText,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    Stream {
        text: MultilineText,
    },
    ExecuteResult {
        #[serde(default)]
        data: MimeBundle,
    },
    DisplayData {
        #[serde(default)]
        data: MimeBundle,
    },
    #[serde(other)]
    Other,
}

impl Output {
    pub fn data(&self) -> Option<&MimeBundle> {
        match self {
            Self::ExecuteResult { data } | Self::DisplayData { data } => Some(data),
            _ => None,
        }
    }
}

/// Output data keyed by mime type.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct MimeBundle(BTreeMap<String, Value>);

impl MimeBundle {
    /// Get the textual contents for a mime type.
    ///
    /// Notebooks store these either as a single string or as a list of lines.
    pub fn text(&self, mime_type: &str) -> Option<String> {
        match self.0.get(mime_type)? {
            Value::String(text) => Some(text.clone()),
            Value::Array(lines) => Some(lines.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }
}

/// A piece of text stored either as a single string or as a list of lines.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MultilineText {
    Single(String),
    Lines(Vec<String>),
}

impl MultilineText {
    pub fn text(&self) -> String {
        match self {
            Self::Single(text) => text.clone(),
            Self::Lines(lines) => lines.concat(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum NotebookError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid notebook: {0}")]
    Json(#[from] serde_json::Error),
}
