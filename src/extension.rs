use crate::post::PostError;

pub const DEFAULT_EXTENSION: &str = "md";

lazy_static::lazy_static! {
    static ref EXTENSION_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9]+$").expect("a valid regex pattern");
}

/// Validates a caller supplied file extension and returns it without a leading dot.
///
/// An absent or empty extension falls back to [`DEFAULT_EXTENSION`].
///
/// # Errors
///
/// Returns [`PostError::InvalidExtension`] carrying the original input when the extension holds
/// anything other than ASCII letters and digits (path separators, wildcards, inner dots...).
pub fn validate_extension(extension: Option<&str>) -> Result<String, PostError> {
    let raw = match extension {
        None | Some("") => return Ok(DEFAULT_EXTENSION.to_string()),
        Some(raw) => raw,
    };

    let stripped = raw.strip_prefix('.').unwrap_or(raw);

    if EXTENSION_REGEX.is_match(stripped) {
        Ok(stripped.to_string())
    } else {
        Err(PostError::InvalidExtension {
            extension: raw.to_string(),
        })
    }
}
