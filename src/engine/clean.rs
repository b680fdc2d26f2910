//! Removal of fingerprinted copies left over from earlier builds.

use std::path::{Path, PathBuf};

use tokio::fs;

use super::Fingerprinter;
use crate::debug;
use crate::error::{FingerprintError, Result};

/// Check whether `name` looks like `{stem}-{hex hash}{ext}`.
///
/// The hash must be exactly `hash_length` lowercase hex digits, so the
/// source file itself and unrelated names sharing the stem never match.
pub fn is_stale_copy(name: &str, stem: &str, ext: &str, hash_length: usize) -> bool {
    name.strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|rest| rest.strip_suffix(ext))
        .is_some_and(|hash| {
            hash.len() == hash_length
                && hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        })
}

impl Fingerprinter {
    /// Delete fingerprinted siblings of `path` from previous runs.
    ///
    /// Returns how many files were removed.
    pub async fn clear_old_files(&self, path: &Path) -> Result<usize> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|err| FingerprintError::io(&dir, err))?;

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| FingerprintError::io(&dir, err))?
        {
            let name = entry.file_name();
            if !is_stale_copy(&name.to_string_lossy(), &stem, &ext, self.config.hash_length) {
                continue;
            }
            let stale = entry.path();
            fs::remove_file(&stale)
                .await
                .map_err(|err| FingerprintError::io(&stale, err))?;
            debug!("clean"; "removed {}", stale.display());
            removed += 1;
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{put, session, session_with};
    use super::super::GeneratedFile;
    use super::*;
    use crate::hash::fingerprint;
    use tempfile::TempDir;

    #[test]
    fn test_is_stale_copy() {
        assert!(is_stale_copy("sample-2df77a0c.css", "sample", ".css", 8));
        assert!(!is_stale_copy("sample.css", "sample", ".css", 8));
        assert!(!is_stale_copy("sample-2df77a0c.js", "sample", ".css", 8));
        assert!(!is_stale_copy("sample-old.css", "sample", ".css", 8));
        assert!(!is_stale_copy("sample-2DF77A0C.css", "sample", ".css", 8));
        assert!(!is_stale_copy("other-2df77a0c.css", "sample", ".css", 8));
        assert!(!is_stale_copy("sample-2df77a0c.css", "sample", ".css", 10));
        assert!(is_stale_copy("LICENSE-2df77a0c", "LICENSE", "", 8));
    }

    #[tokio::test]
    async fn test_clear_old_files() {
        let dir = TempDir::new().unwrap();
        let fp = session(&dir);
        let stale = put(&dir, "css/sample-2df77a0c.css", "old");
        let keep = put(&dir, "css/sample-theme.css", "theme");
        let current = put(&dir, "css/sample.css", "new");

        assert_eq!(fp.clear_old_files(&current).await.unwrap(), 1);
        assert!(!stale.exists());
        assert!(keep.exists());
        assert!(current.exists());
    }

    #[tokio::test]
    async fn test_clear_missing_directory_errors() {
        let dir = TempDir::new().unwrap();
        let fp = session(&dir);
        let path = dir.path().join("public/nowhere/a.css");
        assert!(fp.clear_old_files(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_batch_clears_then_fingerprints() {
        let dir = TempDir::new().unwrap();
        let mut fp = session_with(&dir, |c| c.auto_clear_old_files = true);
        let stale = put(&dir, "css/sample-2df77a0c.css", "old");
        let current = put(&dir, "css/sample.css", "new");

        fp.process_batch(&[GeneratedFile::new(&current)]).await.unwrap();

        assert!(!stale.exists());
        let hash = fingerprint(b"new", 8);
        assert!(dir.path().join(format!("public/css/sample-{hash}.css")).exists());
    }

    #[tokio::test]
    async fn test_batch_survives_cleanup_failure() {
        let dir = TempDir::new().unwrap();
        let mut fp = session_with(&dir, |c| {
            c.auto_clear_old_files = true;
            c.manifest_generation_force = true;
            c.environments = vec![];
        });
        let missing_dir = dir.path().join("public/gone/a.css");

        // Cleanup fails on the missing directory but the file is still
        // recorded (as identity, since the gate is off).
        let last = fp
            .process_batch(&[GeneratedFile::new(&missing_dir)])
            .await
            .unwrap();
        assert_eq!(last, Some(missing_dir));
        assert_eq!(fp.map().get("gone/a.css"), Some("gone/a.css"));
    }
}
