use crate::{
    extension::validate_extension,
    metadata::{merge, FrontMatter, MetadataError, TemplateLoader},
    path::{resolve_target, ResolvedTarget},
    slug::dasherize,
    vfs::{TreeError, VirtualFileTree},
};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PostError {
    #[error("{extension} is not a valid file extension")]
    #[diagnostic(
        code(pluma::post::invalid_extension),
        help("Use letters and digits only, e.g. `md` or `adoc`")
    )]
    InvalidExtension { extension: String },

    #[error("'{name}' has no letters or digits to build a file name from")]
    #[diagnostic(code(pluma::post::invalid_title))]
    InvalidTitle { name: String },

    #[error("Unable to load metadata template '{path}'")]
    #[diagnostic(
        code(pluma::post::template_load),
        help("Check that the metadata file exists and holds a yaml mapping")
    )]
    TemplateLoad {
        path: String,
        #[source]
        source: MetadataError,
    },

    #[error("{slug} exists already at '{path}'")]
    #[diagnostic(
        code(pluma::post::already_exists),
        help("Pick another title or remove the existing post")
    )]
    PostAlreadyExists { slug: String, path: String },

    #[error("Error occurred attempting to serialize front matter")]
    #[diagnostic(code(pluma::post::front_matter))]
    FrontMatter(#[source] serde_yaml::Error),

    #[error("Error occurred attempting to write post")]
    #[diagnostic(code(pluma::post::write))]
    Write(#[source] TreeError),
}

/// What to generate. Unset optional fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Human readable title, e.g. `Foo barBaz`.
    pub name: String,
    /// Directory of the post, `blog` when unset.
    pub target: Option<String>,
    /// File extension, `md` when unset or empty.
    pub extension: Option<String>,
    /// Path of a yaml file with default front matter.
    pub meta_data_file: Option<String>,
}
impl GenerationOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }
    pub fn with_meta_data_file(mut self, path: impl Into<String>) -> Self {
        self.meta_data_file = Some(path.into());
        self
    }
}

/// A post that was added to the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPost {
    pub target: ResolvedTarget,
    pub front_matter: FrontMatter,
    pub content: String,
}

/// Renders the file content: a `---` fenced front matter block followed by a heading.
pub fn render_post(front_matter: &FrontMatter, title: &str) -> Result<String, PostError> {
    let yaml = front_matter.to_yaml().map_err(PostError::FrontMatter)?;

    Ok(format!("---\n{yaml}---\n\n# {title}\n"))
}

/// Generates a new post file inside `tree`.
///
/// The extension is validated, the title dasherized into a slug and the path resolved. When a
/// file is already present at that path nothing is written. Otherwise the front matter is
/// merged (loading `meta_data_file` through `loader` when set) and the post is created.
///
/// Exactly one file is created on success, and the tree is left untouched on failure.
///
/// # Errors
///
/// Returns a [`PostError`] if:
///
/// - The extension contains anything other than letters and digits.
/// - The title yields an empty slug.
/// - A file exists at the resolved path.
/// - The metadata template cannot be loaded or parsed.
/// - The tree refuses the write.
pub fn generate_post<T, L>(
    tree: &mut T,
    loader: &L,
    options: &GenerationOptions,
) -> Result<CreatedPost, PostError>
where
    T: VirtualFileTree + ?Sized,
    L: TemplateLoader + ?Sized,
{
    let extension = validate_extension(options.extension.as_deref())?;

    let slug = dasherize(&options.name);
    if slug.is_empty() {
        return Err(PostError::InvalidTitle {
            name: options.name.clone(),
        });
    }

    let target = resolve_target(options.target.as_deref(), &slug, &extension);

    log::debug!("resolved post path: {}", target.full_path);

    if tree.exists(&target.full_path) {
        return Err(PostError::PostAlreadyExists {
            slug,
            path: target.full_path,
        });
    }

    let template = match options.meta_data_file.as_deref() {
        None | Some("") => None,
        Some(path) => {
            let template = loader
                .load(path)
                .map_err(|source| PostError::TemplateLoad {
                    path: path.to_string(),
                    source,
                })?;
            log::debug!("loaded {} key(s) from {}", template.0.len(), path);
            Some(template)
        }
    };

    let front_matter = merge(template, &options.name);

    let content = render_post(&front_matter, &options.name)?;

    tree.create(&target.full_path, content.clone())
        .map_err(|error| match error {
            TreeError::AlreadyExists { path } => PostError::PostAlreadyExists {
                slug: target.slug.clone(),
                path,
            },
            other => PostError::Write(other),
        })?;

    log::info!("created post {}", target.full_path);

    Ok(CreatedPost {
        target,
        front_matter,
        content,
    })
}
