use crate::theme::{FontSettings, PageMetrics};
use serde::Deserialize;
use std::{fs, io, path::Path};

pub(crate) const DEFAULT_PALETTE: &str = "default";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct Config {
    /// The defaults used for every conversion unless overridden.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// The size of the generated pages.
    #[serde(default)]
    pub page: PageMetrics,

    /// The fonts used in the generated presentations.
    #[serde(default)]
    pub fonts: FontSettings,
}

impl Config {
    /// Load the config from a path.
    ///
    /// A missing file is the same as an empty one.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
#[cfg_attr(feature = "json-schema", derive(schemars::JsonSchema))]
pub struct DefaultsConfig {
    /// The palette to use unless one is given explicitly.
    pub palette: Option<String>,

    /// Whether to include the outputs of notebook code cells.
    #[serde(default)]
    pub outputs: bool,
}

impl DefaultsConfig {
    pub fn palette(&self) -> &str {
        self.palette.as_deref().unwrap_or(DEFAULT_PALETTE)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().expect("no tempdir");
        let config = Config::load(&dir.path().join("config.yaml")).expect("load failed");
        assert_eq!(config.defaults.palette(), "default");
        assert!(!config.defaults.outputs);
        assert_eq!(config.page, PageMetrics::default());
    }

    #[test]
    fn partial_file() {
        let mut file = tempfile::NamedTempFile::new().expect("no tempfile");
        writeln!(file, "defaults:\n  palette: nord\n  outputs: true\nfonts:\n  code_size: 12").unwrap();
        let config = Config::load(file.path()).expect("load failed");
        assert_eq!(config.defaults.palette(), "nord");
        assert!(config.defaults.outputs);
        assert_eq!(config.fonts.code_size, 12);
        assert_eq!(config.fonts.title_size, 44);
        assert_eq!(config.page, PageMetrics::default());
    }

    #[test]
    fn unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("no tempfile");
        writeln!(file, "page:\n  depth: 3").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigLoadError::Invalid(_))));
    }
}
