//! Manifest store: the JSON object the serving layer reads to map logical
//! asset paths to fingerprinted ones.
//!
//! An existing manifest is merged into rather than replaced, so entries from
//! earlier builds that this run did not touch survive. An existing file that
//! is empty or not a JSON object is overwritten.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::fs;

use crate::debug;
use crate::engine::AssetMap;
use crate::error::{FingerprintError, Result};

/// Write `map` to `path`, merging into the existing object if there is one.
///
/// Keys from `map` win over keys already in the file.
pub async fn write_or_merge(path: &Path, map: &AssetMap) -> Result<()> {
    let mut merged = match read_object(path).await {
        Some(existing) => existing,
        None => Map::new(),
    };
    for (key, value) in map.iter() {
        merged.insert(key.to_string(), Value::String(value.to_string()));
    }
    write(path, &merged).await
}

/// Serialize `value` as pretty JSON and write it to `path`.
pub async fn write(path: &Path, value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)
        .await
        .map_err(|err| FingerprintError::io(path, err))
}

/// Read a manifest written by [`write`] back into an [`AssetMap`].
pub async fn read(path: &Path) -> Result<AssetMap> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|err| FingerprintError::io(path, err))?;
    Ok(serde_json::from_str(&raw)?)
}

/// Existing manifest object, if the file holds one.
async fn read_object(path: &Path) -> Option<Map<String, Value>> {
    let raw = fs::read_to_string(path).await.ok()?;
    match serde_json::from_str(&raw) {
        Ok(Value::Object(object)) => Some(object),
        Ok(_) => {
            debug!("manifest"; "{} is not a JSON object, rewriting", path.display());
            None
        }
        Err(err) => {
            debug!("manifest"; "cannot parse {}, rewriting: {}", path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.json");
        let map: AssetMap = [
            ("css/app.css", "css/app-1a2b3c4d.css"),
            ("img/troll.png", "img/troll-5e6f7a8b.png"),
        ]
        .into_iter()
        .collect();

        write_or_merge(&path, &map).await.unwrap();
        assert_eq!(read(&path).await.unwrap(), map);
    }

    #[tokio::test]
    async fn test_merge_overrides_and_keeps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.json");
        std_fs::write(&path, r#"{"a": "1", "old": "kept"}"#).unwrap();

        let map: AssetMap = [("a", "2"), ("b", "3")].into_iter().collect();
        write_or_merge(&path, &map).await.unwrap();

        let value: Value = serde_json::from_str(&std_fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"a": "2", "old": "kept", "b": "3"}));
    }

    #[tokio::test]
    async fn test_unparsable_manifest_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.json");
        let map: AssetMap = [("a", "2")].into_iter().collect();

        for existing in ["", "not json", "[1, 2]"] {
            std_fs::write(&path, existing).unwrap();
            write_or_merge(&path, &map).await.unwrap();
            assert_eq!(read(&path).await.unwrap(), map);
        }
    }

    #[tokio::test]
    async fn test_pretty_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.json");
        let map: AssetMap = [("a", "b")].into_iter().collect();

        write_or_merge(&path, &map).await.unwrap();
        assert_eq!(std_fs::read_to_string(&path).unwrap(), "{\n  \"a\": \"b\"\n}");
    }

    #[tokio::test]
    async fn test_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("assets.json");
        let err = write_or_merge(&path, &AssetMap::new()).await.unwrap_err();
        assert!(matches!(err, FingerprintError::Io(..)));
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn test_read_rejects_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.json");
        std_fs::write(&path, "{").unwrap();
        assert!(matches!(read(&path).await, Err(FingerprintError::Json(_))));
    }
}
