//! Fingerprinting engine.
//!
//! # Module Structure
//!
//! ```text
//! engine/
//! ├── mod.rs     # Fingerprinter session, file rename, batch entry point
//! ├── gate       # environment eligibility predicate
//! ├── map        # AssetMap (logical → fingerprinted)
//! ├── extract    # url(...) reference scanning (pure)
//! ├── resolve    # per-reference rename + content rewrite
//! ├── walk       # folders_to_fingerprint / assets_to_fingerprint
//! └── clean      # stale fingerprinted copies
//! ```
//!
//! # Flow
//!
//! ```text
//! process_batch(files)
//!   for each generated file:
//!     clear_old_files        (if auto_clear_old_files)
//!     not a target?          → identity pair, skip
//!     fingerprint_all        (if auto_replace_and_hash)
//!       or fingerprint_if_eligible
//!   fingerprint folders | explicit assets
//!   write_manifest           (if eligible or forced)
//! ```
//!
//! A [`Fingerprinter`] is one session: it owns the immutable configuration and
//! the growing [`AssetMap`]. All work runs sequentially, so the map needs no
//! synchronization and rename order is deterministic.

mod clean;
mod extract;
mod gate;
mod map;
mod resolve;
mod walk;

pub use clean::is_stale_copy;
pub use extract::{Patterns, Reference, escape_literal, isolate_target};
pub use gate::is_fingerprintable;
pub use map::AssetMap;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::{AssetSelection, ConfigError, FingerprintConfig, FolderSelection};
use crate::error::{FingerprintError, Result};
use crate::hash::fingerprint;
use crate::manifest;
use crate::utils::path::{path_to_string, relativize_to_public_root, strip_prefix};
use crate::{debug, log};

/// A file produced by the upstream build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl From<PathBuf> for GeneratedFile {
    fn from(path: PathBuf) -> Self {
        Self { path }
    }
}

/// One fingerprinting session.
#[derive(Debug)]
pub struct Fingerprinter {
    config: FingerprintConfig,
    patterns: Patterns,
    environment: String,
    map: AssetMap,
    /// Map key → final file name. Map values have the destination base
    /// stripped, so reused targets are located from here instead.
    final_names: HashMap<String, String>,
}

impl Fingerprinter {
    /// Create a session for `environment` with an empty map.
    pub fn new(
        config: FingerprintConfig,
        environment: impl Into<String>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let patterns = Patterns::from_config(&config)
            .map_err(|err| ConfigError::Validation(err.to_string()))?;

        Ok(Self {
            config,
            patterns,
            environment: environment.into(),
            map: AssetMap::new(),
            final_names: HashMap::new(),
        })
    }

    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn map(&self) -> &AssetMap {
        &self.map
    }

    /// Whether renames happen in this session.
    pub fn is_fingerprintable(&self) -> bool {
        is_fingerprintable(
            &self.environment,
            &self.config.environments,
            self.config.always_run,
        )
    }

    // ========================================================================
    // naming and mapping
    // ========================================================================

    /// `dir/stem.ext` → `dir/stem-<hash>.ext`, hash taken over `content`.
    pub fn compose_fingerprinted_name(&self, path: &Path, content: &[u8]) -> PathBuf {
        let hash = fingerprint(content, self.config.hash_length);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let name = match path.extension() {
            Some(ext) => format!("{stem}-{hash}.{}", ext.to_string_lossy()),
            None => format!("{stem}-{hash}"),
        };
        path.with_file_name(name)
    }

    /// Map key for an original path: public-root relative, src base stripped.
    pub(crate) fn map_key(&self, original: &str) -> String {
        let relative = relativize_to_public_root(original, &self.config.public_root_path);
        strip_prefix(&relative, &self.config.src_base_path)
    }

    /// Map value for a final path: public-root relative, dest base stripped.
    pub(crate) fn map_value(&self, fingerprinted: &str) -> String {
        let relative = relativize_to_public_root(fingerprinted, &self.config.public_root_path);
        strip_prefix(&relative, &self.config.dest_base_path)
    }

    /// Record `original → fingerprinted` in the session map.
    pub fn record_mapping(&mut self, original: &Path, fingerprinted: &Path) {
        self.record_mapping_str(&path_to_string(original), &path_to_string(fingerprinted));
    }

    pub(crate) fn record_mapping_str(&mut self, original: &str, fingerprinted: &str) {
        let key = self.map_key(original);
        let value = self.map_value(fingerprinted);
        if let Some(name) = Path::new(fingerprinted).file_name() {
            self.final_names
                .insert(key.clone(), name.to_string_lossy().into_owned());
        }
        if let Some(previous) = self.map.insert(key.clone(), value.clone())
            && previous != value
        {
            debug!("fingerprint"; "{} remapped: {} -> {}", key, previous, value);
        }
    }

    // ========================================================================
    // rename
    // ========================================================================

    /// Read, hash and rename a file. Ignores the eligibility gate.
    pub async fn fingerprint_file(&self, path: &Path) -> Result<PathBuf> {
        let content = fs::read(path)
            .await
            .map_err(|err| FingerprintError::io(path, err))?;
        let renamed = self.compose_fingerprinted_name(path, &content);
        fs::rename(path, &renamed)
            .await
            .map_err(|err| FingerprintError::io(path, err))?;

        debug!("fingerprint"; "{} -> {}", path.display(), renamed.display());
        Ok(renamed)
    }

    /// Rename when eligible, then record the pair. Identity pair otherwise.
    pub async fn fingerprint_if_eligible(&mut self, path: &Path) -> Result<PathBuf> {
        let final_path = if self.is_fingerprintable() {
            self.fingerprint_file(path).await?
        } else {
            path.to_path_buf()
        };
        self.record_mapping(path, &final_path);
        Ok(final_path)
    }

    // ========================================================================
    // batch
    // ========================================================================

    /// Process every generated file of one build, then the configured extra
    /// assets, then write the manifest.
    ///
    /// Returns the last target that was processed. Stops at the first error;
    /// files renamed before it stay renamed.
    pub async fn process_batch(&mut self, files: &[GeneratedFile]) -> Result<Option<PathBuf>> {
        let mut last = None;

        for file in files {
            let path = file.path.as_path();

            // Already renamed as a reference of an earlier file in this batch
            if self.map.contains_key(&self.map_key(&path_to_string(path))) {
                debug!("fingerprint"; "{} already mapped", path.display());
                last = Some(file.path.clone());
                continue;
            }

            if self.config.auto_clear_old_files {
                match self.clear_old_files(path).await {
                    Ok(0) => {}
                    Ok(count) => debug!("clean"; "{} stale copies of {}", count, path.display()),
                    Err(err) => log!("clean"; "{:#}", anyhow::Error::from(err)),
                }
            }

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            if !self.config.targets.matches(&name) {
                self.record_mapping(path, path);
                continue;
            }

            if self.config.auto_replace_and_hash {
                self.fingerprint_all(path).await?;
            } else {
                self.fingerprint_if_eligible(path).await?;
            }
            last = Some(file.path.clone());
        }

        self.fingerprint_selected().await?;
        self.write_manifest().await?;
        Ok(last)
    }

    /// Folder selection wins over the explicit asset list.
    async fn fingerprint_selected(&mut self) -> Result<()> {
        match self.config.folders_to_fingerprint.clone() {
            FolderSelection::One(dir) => self.fingerprint_directory(&dir).await,
            FolderSelection::Many(dirs) => self.fingerprint_directories(&dirs).await,
            FolderSelection::None => match self.config.assets_to_fingerprint.clone() {
                AssetSelection::Paths(paths) => self.fingerprint_assets(&paths).await,
                AssetSelection::None => Ok(()),
            },
        }
    }

    /// Write (or merge into) the manifest. Returns whether it was written.
    pub async fn write_manifest(&self) -> Result<bool> {
        if !self.is_fingerprintable() && !self.config.manifest_generation_force {
            debug!("manifest"; "skipped in {} environment", self.environment);
            return Ok(false);
        }

        manifest::write_or_merge(&self.config.manifest, &self.map).await?;
        debug!("manifest"; "{} entries -> {}", self.map.len(), self.config.manifest.display());
        Ok(true)
    }
}

// ============================================================================
// tests
// ============================================================================
