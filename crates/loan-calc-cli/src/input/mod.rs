pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Structured request from `--input <file.json>` or, failing that, piped stdin.
/// `None` means the caller should fall back to individual flags.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}
