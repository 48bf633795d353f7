use std::path::Path;

use crate::core::errors::{EnvError, Result};
use crate::core::traits::dotenv_source::DotenvMap;

/// Parses `.env` file content into a key/value mapping.
///
/// Supports:
/// - `KEY=value` entries, with an optional `export ` prefix
/// - Quoted values (`KEY="value"` and `KEY='value'`)
/// - Trailing ` # comment` on unquoted values
/// - Comment lines (`# ...`) and blank lines
///
/// A key defined twice keeps its last value.
pub struct DotenvParser;

impl DotenvParser {
    pub fn parse(&self, content: &str, path: &Path) -> Result<DotenvMap> {
        let mut map = DotenvMap::new();

        for (idx, raw) in content.lines().enumerate() {
            if let Some((key, value)) = Self::parse_line(raw, idx + 1, path)? {
                map.insert(key, value);
            }
        }

        Ok(map)
    }

    /// Parse a single line; `None` for blanks and comments.
    fn parse_line(raw: &str, line_number: usize, path: &Path) -> Result<Option<(String, String)>> {
        let trimmed = raw.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);

        // Split on the first '='. The offending line is never echoed back
        // since it may hold a secret.
        let Some(eq_pos) = trimmed.find('=') else {
            return Err(EnvError::Dotenv {
                path: path.to_path_buf(),
                detail: format!("line {line_number}: expected KEY=value"),
            });
        };

        let key = trimmed[..eq_pos].trim().to_string();
        if key.is_empty() {
            return Err(EnvError::Dotenv {
                path: path.to_path_buf(),
                detail: format!("line {line_number}: empty key"),
            });
        }

        let raw_value = trimmed[eq_pos + 1..].trim();
        Ok(Some((key, unquote(raw_value))))
    }
}

/// Remove matching surrounding quotes, or a trailing comment from an
/// unquoted value.
fn unquote(s: &str) -> String {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return s[1..s.len() - 1].to_string();
        }
    }
    match s.find(" #") {
        Some(pos) => s[..pos].trim_end().to_string(),
        None => s.to_string(),
    }
}
