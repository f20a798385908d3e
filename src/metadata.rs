use crate::errors::{FileOperation, IoError};
use indexmap::IndexMap;
use miette::Diagnostic;
use serde::Serialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TITLE_KEY: &str = "title";
pub const DEFAULT_DESCRIPTION: &str = "blog description";

#[derive(Debug, Error, Diagnostic)]
pub enum MetadataError {
    #[error("metadata template not found: '{path}'")]
    #[diagnostic(
        code(pluma::metadata::not_found),
        help("Paths are resolved relative to the project root")
    )]
    NotFound { path: String },

    #[error("I/O error within metadata domain")]
    #[diagnostic(code(pluma::metadata::io))]
    Io(#[from] IoError),

    #[error("Unable to parse yaml file at '{path}': {source}")]
    #[diagnostic(code(pluma::metadata::parse_yaml), help("Review yaml file"))]
    ParseYaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("metadata template '{path}' is not a key/value mapping")]
    #[diagnostic(
        code(pluma::metadata::not_a_mapping),
        help("The template must be a yaml mapping such as `author: John Doe`")
    )]
    NotAMapping { path: String },

    #[error("metadata template '{path}' has a key that is not a string: {key}")]
    #[diagnostic(code(pluma::metadata::non_string_key))]
    NonStringKey { path: String, key: String },
}

/// A single front matter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
    /// Anything else a template may hold (numbers, nested mappings...), kept as parsed.
    Yaml(Value),
}
impl From<Value> for MetaValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(flag) => MetaValue::Bool(flag),
            Value::String(text) => MetaValue::Text(text),
            Value::Sequence(items) if items.iter().all(Value::is_string) => MetaValue::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text),
                        _ => None,
                    })
                    .collect(),
            ),
            other => MetaValue::Yaml(other),
        }
    }
}
impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}
impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

/// Default front matter values read from a template file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataTemplate(pub IndexMap<String, MetaValue>);

/// Ordered front matter of a post. Keys serialize in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter(pub IndexMap<String, MetaValue>);
impl FrontMatter {
    /// Front matter used when no template is given.
    pub fn defaults() -> Self {
        let mut entries = IndexMap::new();
        entries.insert(TITLE_KEY.to_string(), MetaValue::from(""));
        entries.insert("description".to_string(), MetaValue::from(DEFAULT_DESCRIPTION));
        entries.insert("publish".to_string(), MetaValue::from(false));

        Self(entries)
    }
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
    /// Renders the front matter as a yaml document body (without `---` fences).
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Builds the final front matter of a post.
///
/// The template, when given, replaces the built-in defaults entirely. `title` always ends up as
/// the caller's title. An existing `title` key keeps its position, otherwise it is appended.
pub fn merge(template: Option<MetadataTemplate>, title: &str) -> FrontMatter {
    let mut front_matter = match template {
        Some(MetadataTemplate(entries)) => FrontMatter(entries),
        None => FrontMatter::defaults(),
    };

    front_matter
        .0
        .insert(TITLE_KEY.to_string(), MetaValue::from(title));

    front_matter
}

/// Parses the yaml `text` of the template found at `path`.
///
/// An empty document is an empty template.
pub fn parse_template(path: &str, text: &str) -> Result<MetadataTemplate, MetadataError> {
    if text.trim().is_empty() {
        return Ok(MetadataTemplate::default());
    }

    let document: Value =
        serde_yaml::from_str(text).map_err(|source| MetadataError::ParseYaml {
            path: path.to_string(),
            source,
        })?;

    let mapping = match document {
        Value::Mapping(mapping) => mapping,
        Value::Null => return Ok(MetadataTemplate::default()),
        _ => {
            return Err(MetadataError::NotAMapping {
                path: path.to_string(),
            })
        }
    };

    let mut entries = IndexMap::with_capacity(mapping.len());

    for (key, value) in mapping {
        let Value::String(key) = key else {
            return Err(MetadataError::NonStringKey {
                path: path.to_string(),
                key: format!("{key:?}"),
            });
        };

        entries.insert(key, MetaValue::from(value));
    }

    Ok(MetadataTemplate(entries))
}

/// Loads metadata templates by path.
///
/// Any `Fn(&str) -> Result<MetadataTemplate, MetadataError>` is a loader, which keeps
/// in-memory fixtures cheap in tests.
pub trait TemplateLoader {
    fn load(&self, path: &str) -> Result<MetadataTemplate, MetadataError>;
}
impl<F> TemplateLoader for F
where
    F: Fn(&str) -> Result<MetadataTemplate, MetadataError>,
{
    fn load(&self, path: &str) -> Result<MetadataTemplate, MetadataError> {
        self(path)
    }
}

/// Loader for callers that never pass a template path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplates;
impl TemplateLoader for NoTemplates {
    fn load(&self, path: &str) -> Result<MetadataTemplate, MetadataError> {
        Err(MetadataError::NotFound {
            path: path.to_string(),
        })
    }
}

/// Reads yaml templates from disk with a single blocking read.
///
/// Relative paths are resolved against `root`, absolute paths are used as given.
#[derive(Debug, Clone)]
pub struct FsTemplateLoader {
    root: PathBuf,
}
impl FsTemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
    fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);

        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        }
    }
}
impl TemplateLoader for FsTemplateLoader {
    fn load(&self, path: &str) -> Result<MetadataTemplate, MetadataError> {
        let file = self.resolve(path);

        log::debug!("loading metadata template from {}", file.display());

        let text = std::fs::read_to_string(&file).map_err(|error| {
            let error = IoError::new(FileOperation::Read, file.clone(), error);

            if error.is_not_found() {
                MetadataError::NotFound {
                    path: path.to_string(),
                }
            } else {
                error.into()
            }
        })?;

        parse_template(path, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
title: 'This title will be replaced'
thumbnail: assets/images/default.jpg
author: John Doe
mail: John.Doe@example.com
keywords:
  - angular
  - scully
language: en
";

    #[test]
    fn test_merge_without_template_uses_defaults() {
        let front_matter = merge(None, "Foo barBaz");

        assert_eq!(
            front_matter.keys().collect::<Vec<_>>(),
            vec!["title", "description", "publish"]
        );
        assert_eq!(front_matter.get("title"), Some(&MetaValue::from("Foo barBaz")));
        assert_eq!(
            front_matter.get("description"),
            Some(&MetaValue::from("blog description"))
        );
        assert_eq!(front_matter.get("publish"), Some(&MetaValue::Bool(false)));
    }

    #[test]
    fn test_merge_template_keeps_caller_title_in_place() {
        let template = parse_template("meta.yml", TEMPLATE).unwrap();
        let front_matter = merge(Some(template), "Foo barBaz");

        assert_eq!(
            front_matter.keys().collect::<Vec<_>>(),
            vec!["title", "thumbnail", "author", "mail", "keywords", "language"]
        );
        assert_eq!(front_matter.get("title"), Some(&MetaValue::from("Foo barBaz")));
        assert_eq!(
            front_matter.get("keywords"),
            Some(&MetaValue::List(vec![
                "angular".to_string(),
                "scully".to_string()
            ]))
        );
        assert_eq!(front_matter.get("language"), Some(&MetaValue::from("en")));
        assert_eq!(front_matter.get("description"), None);
    }

    #[test]
    fn test_merge_appends_title_when_template_has_none() {
        let template = parse_template("meta.yml", "author: Jane\n").unwrap();
        let front_matter = merge(Some(template), "Hello");

        assert_eq!(front_matter.keys().collect::<Vec<_>>(), vec!["author", "title"]);
    }

    #[test]
    fn test_to_yaml_renders_lists_as_block_sequences() {
        let template = parse_template("meta.yml", TEMPLATE).unwrap();
        let yaml = merge(Some(template), "Foo barBaz").to_yaml().unwrap();

        assert_eq!(
            yaml,
            "title: Foo barBaz\n\
             thumbnail: assets/images/default.jpg\n\
             author: John Doe\n\
             mail: John.Doe@example.com\n\
             keywords:\n\
             - angular\n\
             - scully\n\
             language: en\n"
        );
    }

    #[test]
    fn test_to_yaml_defaults() {
        let yaml = merge(None, "Foo barBaz").to_yaml().unwrap();

        assert_eq!(
            yaml,
            "title: Foo barBaz\ndescription: blog description\npublish: false\n"
        );
    }

    #[test]
    fn test_parse_template_keeps_other_values() {
        let template = parse_template("meta.yml", "year: 2024\ndraft: true\nmixed: [a, 1]\n")
            .unwrap();

        assert!(matches!(template.0.get("year"), Some(MetaValue::Yaml(Value::Number(_)))));
        assert_eq!(template.0.get("draft"), Some(&MetaValue::Bool(true)));
        assert!(matches!(template.0.get("mixed"), Some(MetaValue::Yaml(Value::Sequence(_)))));
    }

    #[test]
    fn test_parse_template_empty_document() {
        assert!(parse_template("meta.yml", "").unwrap().0.is_empty());
        assert!(parse_template("meta.yml", "~\n").unwrap().0.is_empty());
    }

    #[test]
    fn test_parse_template_rejects_invalid_documents() {
        assert!(matches!(
            parse_template("meta.yml", "title: [unclosed"),
            Err(MetadataError::ParseYaml { .. })
        ));
        assert!(matches!(
            parse_template("meta.yml", "- just\n- a list\n"),
            Err(MetadataError::NotAMapping { .. })
        ));
        assert!(matches!(
            parse_template("meta.yml", "1: one\n"),
            Err(MetadataError::NonStringKey { .. })
        ));
    }

    #[test]
    fn test_closure_is_a_template_loader() {
        let loader = |path: &str| parse_template(path, TEMPLATE);

        let template = loader.load("assets/meta-data-template.yml").unwrap();

        assert_eq!(template.0.get("author"), Some(&MetaValue::from("John Doe")));
    }

    #[test]
    fn test_fs_template_loader_reads_relative_to_root() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("assets")).unwrap();
        std::fs::write(root.path().join("assets").join("meta.yml"), TEMPLATE).unwrap();
        let loader = FsTemplateLoader::new(root.path());

        let template = loader.load("assets/meta.yml").unwrap();

        assert_eq!(template.0.len(), 6);
        assert!(matches!(
            loader.load("assets/missing.yml"),
            Err(MetadataError::NotFound { path }) if path == "assets/missing.yml"
        ));
    }

    #[test]
    fn test_no_templates_loader_always_fails() {
        assert!(matches!(
            NoTemplates.load("meta.yml"),
            Err(MetadataError::NotFound { .. })
        ));
    }
}
