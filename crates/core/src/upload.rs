//! Upload file-name rules: validation and stored-name versioning.
//!
//! Pure functions used by both the upload pool (which must never join an
//! unchecked name into a destination path) and the API layer (which rejects
//! bad names before a job is ever constructed).

use crate::error::CoreError;

/// Maximum length of a declared file name, in bytes.
const MAX_NAME_LEN: usize = 255;

/// Validate a caller-declared upload file name.
///
/// Rules:
/// - Must not be empty.
/// - Must not exceed `MAX_NAME_LEN` bytes.
/// - Must not contain path separators (`/` or `\`) or NUL/control characters.
/// - Must not be `.` or `..`.
///
/// The name is validated, never rewritten: a name that would need
/// normalization is rejected so the stored name always matches the declared
/// name (modulo collision versioning).
pub fn validate_file_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "File name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "File name must not exceed {MAX_NAME_LEN} bytes"
        )));
    }
    if name == "." || name == ".." {
        return Err(CoreError::Validation(format!(
            "File name {name:?} is not allowed"
        )));
    }
    if name.chars().any(|c| c == '/' || c == '\\') {
        return Err(CoreError::Validation(
            "File name must not contain path separators".to_string(),
        ));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(CoreError::Validation(
            "File name must not contain control characters".to_string(),
        ));
    }
    Ok(())
}

/// Build the `n`-th versioned variant of a file name.
///
/// Version 0 is the name itself; version `n > 0` inserts `-{n}` before the
/// extension: `photo.png` -> `photo-1.png`, `archive.tar.gz` ->
/// `archive.tar-1.gz` (only the final extension is preserved), `README` ->
/// `README-1`.
pub fn versioned_name(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        // A leading dot is a hidden file, not an extension boundary.
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{n}.{ext}"),
        _ => format!("{name}-{n}"),
    }
}
