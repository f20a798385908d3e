use crate::{
    errors::{FileOperation, IoError},
    post::GenerationOptions,
};
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "pluma.toml";

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(pluma::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(pluma::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Project wide settings read from `pluma.toml`.
///
/// ```toml
/// [post]
/// target = "content/blog"
/// extension = "md"
/// meta_data_file = "assets/meta-data-template.yml"
/// ```
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub post: PostDefaults,
}
impl ProjectConfig {
    /// Reads `pluma.toml` from `root`. A missing file means every setting keeps its default.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_file = root.join(CONFIG_FILE_NAME);

        let content = match fs::read_to_string(&config_file) {
            Ok(content) => content,
            Err(error) => {
                let error = IoError::new(FileOperation::Read, config_file.clone(), error);

                if error.is_not_found() {
                    log::debug!("no {} in {}", CONFIG_FILE_NAME, root.display());
                    return Ok(Self::default());
                }

                Err(error)?
            }
        };

        toml::from_str(&content).map_err(|err| ConfigError::ParseToml {
            path: config_file,
            source: err,
        })
    }
}

/// Fallback values for post options the caller left out.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PostDefaults {
    pub target: Option<String>,
    pub extension: Option<String>,
    pub meta_data_file: Option<String>,
}
impl PostDefaults {
    /// Fills unset or empty fields of `options`. Values set by the caller are kept.
    pub fn apply(&self, mut options: GenerationOptions) -> GenerationOptions {
        fill(&mut options.target, &self.target);
        fill(&mut options.extension, &self.extension);
        fill(&mut options.meta_data_file, &self.meta_data_file);

        options
    }
}

fn fill(slot: &mut Option<String>, fallback: &Option<String>) {
    if slot.as_deref().map_or(true, str::is_empty) {
        if let Some(fallback) = fallback {
            *slot = Some(fallback.clone());
        }
    }
}
