use std::path::Path;

/// Longest extension carried over from an upload's original filename.
const MAX_EXTENSION_LEN: usize = 16;

/// Reasons a stored image name is rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum NameError {
    /// Name is empty or whitespace-only.
    Empty,
    /// Name contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Name is `..`.
    PathTraversal,
    /// Name contains null bytes.
    NullByte,
    /// Name starts with a dot (hidden file, or the store's scratch directory).
    Hidden,
    /// Name contains control characters (CR, LF, etc.).
    ControlCharacter,
}

impl NameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Image name cannot be empty",
            Self::ContainsPathSeparator => "Invalid image name: path separators are not allowed",
            Self::PathTraversal => "Invalid image name: '..' is not allowed",
            Self::NullByte => "Invalid image name: null bytes are not allowed",
            Self::Hidden => "Invalid image name: hidden files are not allowed",
            Self::ControlCharacter => "Invalid image name: control characters are not allowed",
        }
    }
}

/// Validates a flat image name (no directory components allowed).
///
/// Unlike upload filenames, stored names are never trimmed: the name on disk
/// must match the request byte for byte.
pub fn validate_image_name(name: &str) -> Result<&str, NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty);
    }

    if name.contains('\0') {
        return Err(NameError::NullByte);
    }

    if name.chars().any(|c| c.is_ascii_control()) {
        return Err(NameError::ControlCharacter);
    }

    if name.contains('/') || name.contains('\\') {
        return Err(NameError::ContainsPathSeparator);
    }

    if name == ".." {
        return Err(NameError::PathTraversal);
    }

    if name.starts_with('.') {
        return Err(NameError::Hidden);
    }

    Ok(name)
}

/// Extension (with leading dot, lower-cased) to carry from an upload's
/// original filename onto its stored name.
///
/// Returns an empty string when the original has no usable extension.
pub fn image_extension(original_filename: &str) -> String {
    // Clients on Windows may send full paths; keep only the final component.
    let base = original_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_filename);

    Path::new(base)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}
