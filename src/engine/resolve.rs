//! Sub-asset resolution: rename what a file references, rewrite the
//! references, then rename the file itself.

use std::path::{Path, PathBuf};

use tokio::fs;

use super::{Fingerprinter, Reference};
use crate::debug;
use crate::error::{FingerprintError, Result};
use crate::utils::path::{join_normalized, path_to_string, public_url};

impl Fingerprinter {
    /// Fingerprint `path` after fingerprinting every asset it references.
    ///
    /// References are resolved one at a time in order of appearance. A
    /// target that already has a map entry is reused instead of renamed
    /// again, so several files can share one image. Content that is not
    /// valid UTF-8 is treated as having no references.
    pub async fn fingerprint_all(&mut self, path: &Path) -> Result<PathBuf> {
        let bytes = fs::read(path)
            .await
            .map_err(|err| FingerprintError::io(path, err))?;
        let Ok(original) = String::from_utf8(bytes) else {
            debug!("resolve"; "{} is not UTF-8, no references", path.display());
            return self.fingerprint_if_eligible(path).await;
        };

        let raw_matches: Vec<String> = self
            .patterns
            .extract_references(&original)
            .into_iter()
            .map(str::to_string)
            .collect();
        if raw_matches.is_empty() {
            return self.fingerprint_if_eligible(path).await;
        }

        let rewrite = self.is_fingerprintable();
        let mut content = original.clone();
        for raw in &raw_matches {
            let reference = Reference::parse(raw, &self.patterns);
            if reference.is_external() {
                debug!("resolve"; "skipping external {}", reference.path);
                continue;
            }

            let resolved = self.resolve_reference(&reference).await?;
            if rewrite {
                let url = public_url(&resolved, &self.config.public_root_path);
                let replacement = format!("url('{url}{}')", reference.suffix);
                content = reference.rewrite(&content, &replacement);
            }
        }

        if content != original {
            fs::write(path, &content)
                .await
                .map_err(|err| FingerprintError::io(path, err))?;
        }

        self.fingerprint_if_eligible(path).await
    }

    /// Resolve one reference to its fingerprinted location.
    ///
    /// Returns the final on-disk path: for a target seen before, its recorded
    /// file name next to the target, otherwise the renamed path (or the unchanged target when
    /// the gate is off), recording the new pair.
    pub(crate) async fn resolve_reference(&mut self, reference: &Reference) -> Result<String> {
        let target = join_normalized(&self.config.public_root_path, &reference.path);

        let key = self.map_key(&target);
        if self.map.contains_key(&key) {
            let reused = match self.final_names.get(&key) {
                Some(name) => path_to_string(&Path::new(&target).with_file_name(name)),
                None => target,
            };
            debug!("resolve"; "reusing {} for {}", reused, key);
            return Ok(reused);
        }

        let resolved = if self.is_fingerprintable() {
            let renamed = self.fingerprint_file(Path::new(&target)).await?;
            path_to_string(&renamed)
        } else {
            target.clone()
        };

        self.record_mapping_str(&target, &resolved);
        Ok(resolved)
    }
}
