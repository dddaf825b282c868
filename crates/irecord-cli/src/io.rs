//! File helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

pub fn read_json_file(path: &str) -> Result<Value> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {path}"))?;
    serde_json::from_slice(&bytes).with_context(|| format!("{path} is not valid JSON"))
}

pub fn write_json_file(path: &str, value: &Value) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s).with_context(|| format!("failed to write {path}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let path = path.to_str().unwrap();

        let value = json!({ "version": "202304" });
        write_json_file(path, &value).unwrap();
        assert_eq!(read_json_file(path).unwrap(), value);
    }

    #[test]
    fn invalid_json_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{nope").unwrap();
        let err = read_json_file(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
