//! Scaffolds new blog posts: a dasherized file name, a YAML front matter block and a body
//! placeholder, written into a [`vfs::VirtualFileTree`] without ever overwriting a file.
pub mod api;
pub mod config;
pub mod errors;
pub mod extension;
pub mod metadata;
pub mod path;
pub mod post;
pub mod slug;
pub mod transactions;
pub mod vfs;

pub use api::{add_post, PlumaError};
pub use post::{generate_post, CreatedPost, GenerationOptions, PostError};
