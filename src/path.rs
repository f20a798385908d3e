pub const DEFAULT_TARGET: &str = "blog";

/// Normalizes a virtual path into the absolute, forward-slash form used as a tree key.
///
/// Duplicate separators and `.` segments are dropped. A `..` segment pops the previous
/// segment, and stops at the root, so the result never points outside the tree.
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            // Skip empty segments ("//") and the current-dir marker "."
            "" | "." => {}

            // For "..", pop the last segment if possible
            ".." => {
                segments.pop();
            }

            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}

/// The location a post will be written to, derived from the target directory, slug and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Normalized directory, e.g. `/blog`. The tree root is `/`.
    pub directory: String,
    pub slug: String,
    pub extension: String,
    /// `<directory>/<slug>.<extension>`
    pub full_path: String,
}

/// Resolves the final path of a post. An absent or empty `target` means [`DEFAULT_TARGET`].
pub fn resolve_target(target: Option<&str>, slug: &str, extension: &str) -> ResolvedTarget {
    let target = match target {
        None | Some("") => DEFAULT_TARGET,
        Some(target) => target,
    };

    let directory = normalize_path(target);
    let file_name = format!("{slug}.{extension}");

    let full_path = if directory == "/" {
        format!("/{file_name}")
    } else {
        format!("{directory}/{file_name}")
    };

    ResolvedTarget {
        directory,
        slug: slug.to_string(),
        extension: extension.to_string(),
        full_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_collapses_separators() {
        assert_eq!(normalize_path("foo//bar/"), "/foo/bar");
        assert_eq!(normalize_path("/foo/./bar"), "/foo/bar");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_normalize_path_clamps_parent_segments_at_root() {
        assert_eq!(normalize_path("foo/../bar"), "/bar");
        assert_eq!(normalize_path("../../etc"), "/etc");
        assert_eq!(normalize_path("/.."), "/");
    }

    #[test]
    fn test_resolve_target_defaults_to_blog() {
        let resolved = resolve_target(None, "foo-bar-baz", "md");

        assert_eq!(resolved.directory, "/blog");
        assert_eq!(resolved.full_path, "/blog/foo-bar-baz.md");

        let resolved = resolve_target(Some(""), "foo-bar-baz", "md");
        assert_eq!(resolved.full_path, "/blog/foo-bar-baz.md");
    }

    #[test]
    fn test_resolve_target_keeps_nested_directories() {
        let resolved = resolve_target(Some("foo/bar"), "foo-bar-baz", "md");

        assert_eq!(resolved.directory, "/foo/bar");
        assert_eq!(resolved.full_path, "/foo/bar/foo-bar-baz.md");
    }

    #[test]
    fn test_resolve_target_tolerates_odd_directories() {
        assert_eq!(
            resolve_target(Some("//foo///bar//"), "post", "adoc").full_path,
            "/foo/bar/post.adoc"
        );
        assert_eq!(resolve_target(Some("."), "post", "md").full_path, "/post.md");
        assert_eq!(
            resolve_target(Some("../outside"), "post", "md").full_path,
            "/outside/post.md"
        );
    }

    #[test]
    fn test_resolve_target_is_deterministic() {
        assert_eq!(
            resolve_target(Some("news"), "hello", "md"),
            resolve_target(Some("news"), "hello", "md")
        );
    }
}
