use crate::{
    config::{self, ProjectConfig},
    metadata::FsTemplateLoader,
    post::{self, generate_post, CreatedPost, GenerationOptions},
    vfs::DiskTree,
};
use std::path::Path;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum PlumaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Post(#[from] post::PostError),
}

/// Adds a new post to the project rooted at `root`.
///
/// Settings from `pluma.toml` fill in options left unset, and the metadata template is read
/// relative to `root`.
///
/// # Errors
///
/// Returns a [`PlumaError`] if:
///
/// - `pluma.toml` exists but cannot be read or parsed.
/// - The extension or title is invalid.
/// - A post already exists at the resolved path.
/// - The metadata template cannot be loaded.
/// - A directory or file cannot be created or written to.
pub fn add_post(root: &Path, options: GenerationOptions) -> Result<CreatedPost, PlumaError> {
    let config = ProjectConfig::load(root)?;

    log::debug!("Attempting to add post to project at: {}", root.display());

    let options = config.post.apply(options);

    let mut tree = DiskTree::new(root);
    let loader = FsTemplateLoader::new(root);

    let created = generate_post(&mut tree, &loader, &options)?;

    Ok(created)
}
