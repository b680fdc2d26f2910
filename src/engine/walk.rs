//! Extra assets outside the build output: whole folders or explicit paths.

use std::path::Path;

use tokio::fs;

use super::{Fingerprinter, Reference};
use crate::debug;
use crate::error::{FingerprintError, Result};
use crate::utils::path::join_normalized;

impl Fingerprinter {
    /// Fingerprint every regular file directly inside `dir`.
    ///
    /// `dir` is relative to the public root (`/img`). Entries are handled in
    /// name order; subdirectories are not descended into, and files that are
    /// already fingerprinted outputs of this session are skipped.
    pub async fn fingerprint_directory(&mut self, dir: &str) -> Result<()> {
        let full = join_normalized(&self.config.public_root_path, dir);
        let names = list_files(Path::new(&full)).await?;

        let base = dir.trim_end_matches('/');
        for name in names {
            let item = format!("{base}/{name}");
            let target = join_normalized(&self.config.public_root_path, &item);
            if self.map.contains_value(&self.map_value(&target)) {
                debug!("walk"; "{} already fingerprinted", target);
                continue;
            }
            self.resolve_reference(&Reference::plain(item)).await?;
        }
        Ok(())
    }

    /// Fingerprint several folders in order, stopping at the first error.
    pub async fn fingerprint_directories(&mut self, dirs: &[String]) -> Result<()> {
        for dir in dirs {
            self.fingerprint_directory(dir).await?;
        }
        Ok(())
    }

    /// Fingerprint an explicit list of public-root-relative paths.
    pub async fn fingerprint_assets(&mut self, paths: &[String]) -> Result<()> {
        for path in paths {
            self.resolve_reference(&Reference::plain(path.as_str())).await?;
        }
        Ok(())
    }
}

/// Sorted names of the regular files in `dir`.
async fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|err| FingerprintError::io(dir, err))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| FingerprintError::io(dir, err))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|err| FingerprintError::io(entry.path(), err))?;
        if file_type.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::super::tests::{put, session, session_with};
    use super::super::GeneratedFile;
    use crate::config::{AssetSelection, FolderSelection};
    use crate::error::FingerprintError;
    use crate::hash::fingerprint;
    use std::fs;
    use tempfile::TempDir;

    fn names_in(dir: &TempDir, rel: &str) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir.path().join("public").join(rel))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_directory_renames_files_only() {
        let dir = TempDir::new().unwrap();
        let mut fp = session(&dir);
        put(&dir, "img/a.png", "a");
        put(&dir, "img/b.gif", "b");
        put(&dir, "img/nested/c.png", "c");

        fp.fingerprint_directory("/img").await.unwrap();

        let (ha, hb) = (fingerprint(b"a", 8), fingerprint(b"b", 8));
        assert_eq!(
            names_in(&dir, "img"),
            vec![format!("a-{ha}.png"), format!("b-{hb}.gif"), "nested".to_string()]
        );
        assert_eq!(names_in(&dir, "img/nested"), vec!["c.png".to_string()]);
        assert_eq!(fp.map().get("img/a.png"), Some(format!("img/a-{ha}.png").as_str()));
    }

    #[tokio::test]
    async fn test_directory_skips_already_fingerprinted() {
        let dir = TempDir::new().unwrap();
        let mut fp = session(&dir);
        put(&dir, "img/troll.png", "troll");
        let css = put(&dir, "css/a.css", ".a{background:url('/img/troll.png')}");

        fp.fingerprint_all(&css).await.unwrap();
        fp.fingerprint_directory("/img/").await.unwrap();

        let hash = fingerprint(b"troll", 8);
        assert_eq!(names_in(&dir, "img"), vec![format!("troll-{hash}.png")]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut fp = session(&dir);
        let err = fp.fingerprint_directory("/nope").await.unwrap_err();
        assert!(matches!(err, FingerprintError::Io(..)));
    }

    #[tokio::test]
    async fn test_directories_short_circuit() {
        let dir = TempDir::new().unwrap();
        let mut fp = session(&dir);
        put(&dir, "img/a.png", "a");
        put(&dir, "fonts/f.woff", "f");

        let dirs = vec!["/img".to_string(), "/missing".into(), "/fonts".into()];
        assert!(fp.fingerprint_directories(&dirs).await.is_err());

        assert_eq!(names_in(&dir, "img"), vec![format!("a-{}.png", fingerprint(b"a", 8))]);
        assert_eq!(names_in(&dir, "fonts"), vec!["f.woff".to_string()]);
    }

    #[tokio::test]
    async fn test_explicit_assets() {
        let dir = TempDir::new().unwrap();
        let mut fp = session(&dir);
        put(&dir, "fonts/a.woff2", "woff");
        put(&dir, "fonts/b.woff2", "other");

        fp.fingerprint_assets(&["/fonts/a.woff2".to_string()]).await.unwrap();

        let hash = fingerprint(b"woff", 8);
        assert_eq!(
            names_in(&dir, "fonts"),
            vec![format!("a-{hash}.woff2"), "b.woff2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_batch_folders_take_precedence_over_assets() {
        let dir = TempDir::new().unwrap();
        let mut fp = session_with(&dir, |c| {
            c.folders_to_fingerprint = FolderSelection::One("/img".into());
            c.assets_to_fingerprint = AssetSelection::Paths(vec!["/fonts/a.woff".into()]);
        });
        put(&dir, "img/a.png", "a");
        put(&dir, "fonts/a.woff", "f");
        let js = put(&dir, "js/app.js", "app()");

        fp.process_batch(&[GeneratedFile::new(&js)]).await.unwrap();

        assert_eq!(names_in(&dir, "img"), vec![format!("a-{}.png", fingerprint(b"a", 8))]);
        assert_eq!(names_in(&dir, "fonts"), vec!["a.woff".to_string()]);
    }

    #[tokio::test]
    async fn test_batch_uses_assets_without_folders() {
        let dir = TempDir::new().unwrap();
        let mut fp = session_with(&dir, |c| {
            c.assets_to_fingerprint = AssetSelection::Paths(vec!["/fonts/a.woff".into()]);
        });
        put(&dir, "fonts/a.woff", "f");
        let js = put(&dir, "js/app.js", "app()");

        fp.process_batch(&[GeneratedFile::new(&js)]).await.unwrap();

        let raw = fs::read_to_string(dir.path().join("assets.json")).unwrap();
        let manifest: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            manifest["fonts/a.woff"],
            format!("fonts/a-{}.woff", fingerprint(b"f", 8))
        );
    }
}
