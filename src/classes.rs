//! Class-name list loading
//!
//! The label file is plain text, one label per line. The list is loaded once
//! at session start, owned by the session, and read by the frame pump.

use crate::error::{LookoutError, LookoutResult};
use std::path::Path;
use std::sync::Arc;

/// Load a class-name list from a plain-text file, one label per line.
/// Blank lines and surrounding whitespace are ignored.
pub fn load_class_names(path: &Path) -> LookoutResult<Arc<[String]>> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        LookoutError::ClassNamesLoadFailed {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let names: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if names.is_empty() {
        return Err(LookoutError::ClassNamesEmpty(path.to_path_buf()));
    }

    Ok(names.into())
}
