use crate::{
    errors::{FileOperation, IoError},
    path::normalize_path,
    transactions::{Active, RollbackOperation, Transaction},
};
use indexmap::IndexMap;
use miette::Diagnostic;
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TreeError {
    #[error("'{path}' already exists")]
    #[diagnostic(
        code(pluma::vfs::already_exists),
        help("Existing files are never overwritten, remove or rename it first")
    )]
    AlreadyExists { path: String },

    #[error("'{path}' does not exist")]
    #[diagnostic(code(pluma::vfs::not_found))]
    NotFound { path: String },

    #[error("I/O error within file tree")]
    #[diagnostic(code(pluma::vfs::io))]
    Io(#[from] IoError),
}

/// The set of project files a post is generated into.
///
/// Paths are virtual, forward-slash and relative to the project root. Implementations normalize
/// them with [`normalize_path`] so `blog/a.md` and `/blog/a.md` name the same file.
pub trait VirtualFileTree {
    fn exists(&self, path: &str) -> bool;

    fn read(&self, path: &str) -> Result<String, TreeError>;

    /// Adds a new file.
    ///
    /// # Errors
    ///
    /// Must fail with [`TreeError::AlreadyExists`] when `path` is taken. Existing content is
    /// never replaced.
    fn create(&mut self, path: &str, content: String) -> Result<(), TreeError>;
}

/// In-memory [`VirtualFileTree`], keyed by normalized path in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    files: IndexMap<String, String>,
}
impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }
    /// Paths of all files, in the order they were created.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.files.len()
    }
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
impl VirtualFileTree for MemoryTree {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(&normalize_path(path))
    }

    fn read(&self, path: &str) -> Result<String, TreeError> {
        let key = normalize_path(path);

        self.files
            .get(&key)
            .cloned()
            .ok_or(TreeError::NotFound { path: key })
    }

    fn create(&mut self, path: &str, content: String) -> Result<(), TreeError> {
        let key = normalize_path(path);

        if self.files.contains_key(&key) {
            return Err(TreeError::AlreadyExists { path: key });
        }

        self.files.insert(key, content);

        Ok(())
    }
}

/// [`VirtualFileTree`] backed by a directory on disk.
///
/// The virtual root `/` maps to `root`. A failed [`VirtualFileTree::create`] removes any
/// directory it made along the way.
#[derive(Debug, Clone)]
pub struct DiskTree {
    root: PathBuf,
}
impl DiskTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
    pub fn root(&self) -> &Path {
        &self.root
    }
    /// Location on disk of a virtual path.
    pub fn disk_path(&self, path: &str) -> PathBuf {
        let key = normalize_path(path);

        self.root.join(key.trim_start_matches('/'))
    }
}
impl VirtualFileTree for DiskTree {
    fn exists(&self, path: &str) -> bool {
        self.disk_path(path).exists()
    }

    fn read(&self, path: &str) -> Result<String, TreeError> {
        let disk_path = self.disk_path(path);

        fs::read_to_string(&disk_path).map_err(|error| {
            let error = IoError::new(FileOperation::Read, disk_path, error);

            if error.is_not_found() {
                TreeError::NotFound {
                    path: normalize_path(path),
                }
            } else {
                error.into()
            }
        })
    }

    fn create(&mut self, path: &str, content: String) -> Result<(), TreeError> {
        let disk_path = self.disk_path(path);

        let mut trx = Transaction::<Active>::new();

        if let Some(parent) = disk_path.parent() {
            create_directory(&mut trx, parent)?;
        }

        write_new_file(&mut trx, &disk_path, &content).map_err(|error| match error {
            TreeError::AlreadyExists { .. } => TreeError::AlreadyExists {
                path: normalize_path(path),
            },
            other => other,
        })?;

        trx.commit();

        Ok(())
    }
}
/// Creates `path` and any missing parents.
///
/// Only the outermost directory that did not exist yet is registered for rollback, so
/// directories that were already there survive a rollback.
fn create_directory(trx: &mut Transaction<Active>, path: &Path) -> Result<(), TreeError> {
    let outermost_missing = path
        .ancestors()
        .take_while(|ancestor| !ancestor.as_os_str().is_empty() && !ancestor.exists())
        .last()
        .map(Path::to_path_buf);

    let Some(outermost_missing) = outermost_missing else {
        return Ok(());
    };

    fs::create_dir_all(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, path.to_path_buf(), error))?;

    trx.add_operation(RollbackOperation::RemoveDir(outermost_missing));

    Ok(())
}
/// Writes `contents` to a file that must not exist yet.
fn write_new_file(
    trx: &mut Transaction<Active>,
    path: &Path,
    contents: &str,
) -> Result<(), TreeError> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|error| {
            if error.kind() == ErrorKind::AlreadyExists {
                TreeError::AlreadyExists {
                    path: path.display().to_string(),
                }
            } else {
                IoError::new(FileOperation::Write, path.to_path_buf(), error).into()
            }
        })?;

    trx.add_operation(RollbackOperation::RemoveFile(path.to_path_buf()));

    file.write_all(contents.as_bytes())
        .map_err(|error| IoError::new(FileOperation::Write, path.to_path_buf(), error))?;

    log::debug!("wrote {} bytes to {}", contents.len(), path.display());

    Ok(())
}
