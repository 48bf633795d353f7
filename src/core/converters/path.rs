use std::path::{Component, Path, PathBuf};

use super::error::ConversionError;
use crate::core::models::value::Value;

/// Resolve `raw` to an absolute, normalized path.
///
/// Relative paths are joined onto the current working directory. When
/// `create_if_missing` is set a missing directory is created; otherwise a
/// missing path fails only if `check_exists` is set.
pub fn to_path(
    raw: &str,
    check_exists: bool,
    create_if_missing: bool,
) -> Result<Value, ConversionError> {
    let path = absolute(Path::new(raw)).map_err(|e| {
        ConversionError::Custom(format!("cannot resolve '{raw}' against the working directory: {e}"))
    })?;

    if !path.exists() {
        if create_if_missing {
            tracing::debug!(path = %path.display(), "creating missing directory");
            std::fs::create_dir_all(&path).map_err(|source| {
                ConversionError::CreateDirectory {
                    path: path.clone(),
                    source,
                }
            })?;
        } else if check_exists {
            return Err(ConversionError::PathNotFound { path });
        }
    }

    Ok(Value::Path(path))
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    // `components()` drops trailing separators and interior `.` segments.
    Ok(joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect())
}
