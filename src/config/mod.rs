//! Fingerprinting configuration (`fingerprint.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── select     # targets / folders / assets selectors
//! ├── util       # config file discovery
//! └── mod.rs     # FingerprintConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! manifest = "./public/assets.json"
//! public_root_path = "./public"
//! src_base_path = "public/"
//! dest_base_path = "public/"
//! hash_length = 8
//! environments = ["production"]
//! auto_replace_and_hash = true
//! folders_to_fingerprint = ["/img", "/fonts"]
//! ```
//!
//! Every field is optional. The configuration is loaded once, overridden by
//! CLI flags, validated, and then treated as immutable for the session.

mod error;
mod select;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use select::{AssetSelection, FolderSelection, Targets};

use crate::cli::Cli;
use crate::hash::MAX_HASH_LENGTH;
use crate::{debug, log};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

/// Matches `url(...)` references to font and image files, optionally quoted,
/// optionally followed by a query string and/or fragment.
pub const DEFAULT_ASSETS_PATTERN: &str = r#"url\(['"]?[a-zA-Z0-9\-/_.:]+\.(woff|woff2|eot|ttf|otf|jpg|jpeg|png|bmp|gif|svg)\??#?[a-zA-Z0-9\-/_=&.#]*['"]?\)"#;

/// Matches each `?key=value`, `&key=value` and `#fragment` part of a URL.
pub const DEFAULT_PARAMETERS_PATTERN: &str = r"(\?|&|#)([^=]?)([^&]*)";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing fingerprint.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Manifest file the serving layer reads.
    pub manifest: PathBuf,

    /// Removed (first occurrence) from every manifest key.
    pub src_base_path: String,

    /// Removed (first occurrence) from every manifest value.
    pub dest_base_path: String,

    /// Hex characters of the digest embedded in file names.
    pub hash_length: usize,

    /// Delete stale `base-<hash>.ext` siblings before fingerprinting.
    pub auto_clear_old_files: bool,

    /// Generated files to fingerprint, by file name.
    pub targets: Targets,

    /// Environments in which fingerprinting runs.
    pub environments: Vec<String>,

    /// Fingerprint regardless of environment.
    pub always_run: bool,

    /// Rewrite and fingerprint `url(...)` references inside generated files.
    pub auto_replace_and_hash: bool,

    /// Directory that served asset paths are relative to.
    pub public_root_path: String,

    /// Write the manifest even when nothing is fingerprinted.
    pub manifest_generation_force: bool,

    /// Public-root directories fingerprinted after each batch.
    pub folders_to_fingerprint: FolderSelection,

    /// Public-root-relative files fingerprinted after each batch.
    pub assets_to_fingerprint: AssetSelection,

    /// Pattern locating embedded asset references.
    pub assets_pattern: String,

    /// Pattern locating query/fragment parts of a reference.
    pub parameters_pattern: String,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            manifest: PathBuf::from("./assets.json"),
            src_base_path: "public/".into(),
            dest_base_path: "public/".into(),
            hash_length: 8,
            auto_clear_old_files: false,
            targets: Targets::All,
            environments: vec!["production".into()],
            always_run: false,
            auto_replace_and_hash: false,
            public_root_path: "./public".into(),
            manifest_generation_force: false,
            folders_to_fingerprint: FolderSelection::None,
            assets_to_fingerprint: AssetSelection::None,
            assets_pattern: DEFAULT_ASSETS_PATTERN.into(),
            parameters_pattern: DEFAULT_PARAMETERS_PATTERN.into(),
        }
    }
}

impl FingerprintConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file; a missing file means
    /// defaults. CLI flags are applied on top, then the result is validated.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                Self::default()
            }
        };

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Apply CLI overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(manifest) = &cli.manifest {
            self.manifest = manifest.clone();
        }
        if let Some(root) = &cli.public_root {
            self.public_root_path = root.clone();
        }
        if let Some(v) = cli.always_run {
            self.always_run = v;
        }
        if let Some(v) = cli.auto_replace {
            self.auto_replace_and_hash = v;
        }
        if let Some(v) = cli.force_manifest {
            self.manifest_generation_force = v;
        }
        if let Some(v) = cli.clear_old {
            self.auto_clear_old_files = v;
        }
    }

    /// Validate all fields, collecting every problem before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if self.hash_length == 0 || self.hash_length > MAX_HASH_LENGTH {
            diag.error_with_hint(
                "hash_length",
                format!("must be between 1 and {MAX_HASH_LENGTH}, got {}", self.hash_length),
                "8 is a good default",
            );
        }

        if self.manifest.as_os_str().is_empty() {
            diag.error("manifest", "must not be empty");
        }

        if self.public_root_path.is_empty() {
            diag.error_with_hint(
                "public_root_path",
                "must not be empty",
                "use \"./\" for the current directory",
            );
        }

        if let Err(err) = Regex::new(&self.assets_pattern) {
            diag.error("assets_pattern", format!("invalid regex: {err}"));
        }

        if let Err(err) = Regex::new(&self.parameters_pattern) {
            diag.error("parameters_pattern", format!("invalid regex: {err}"));
        }

        if let Targets::Only(names) = &self.targets
            && names.iter().any(|name| name.contains('/') || name.contains('\\'))
        {
            diag.error_with_hint(
                "targets",
                "entries are file names, not paths",
                "write \"app.js\" instead of \"js/app.js\"",
            );
        }

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config_is_valid() {
        let config = FingerprintConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hash_length, 8);
        assert_eq!(config.environments, vec!["production".to_string()]);
        assert_eq!(config.targets, Targets::All);
    }

    #[test]
    fn test_parse_full_config() {
        let config = FingerprintConfig::from_str(
            r#"
            manifest = "./public/assets.json"
            src_base_path = "public/"
            dest_base_path = "public/"
            hash_length = 10
            auto_clear_old_files = true
            targets = ["app.js", "app.css"]
            environments = ["production", "staging"]
            always_run = false
            auto_replace_and_hash = true
            public_root_path = "./public"
            manifest_generation_force = true
            folders_to_fingerprint = "/img"
            assets_to_fingerprint = ["/fonts/a.woff"]
            "#,
        )
        .unwrap();

        assert_eq!(config.manifest, PathBuf::from("./public/assets.json"));
        assert_eq!(config.hash_length, 10);
        assert!(config.auto_clear_old_files);
        assert!(config.targets.matches("app.css"));
        assert!(config.auto_replace_and_hash);
        assert_eq!(config.folders_to_fingerprint, FolderSelection::One("/img".into()));
        assert_eq!(
            config.assets_to_fingerprint,
            AssetSelection::Paths(vec!["/fonts/a.woff".into()])
        );
        // Unset fields keep their defaults
        assert_eq!(config.assets_pattern, DEFAULT_ASSETS_PATTERN);
    }

    #[test]
    fn test_parse_with_ignored_collects_unknown_fields() {
        let (config, ignored) =
            FingerprintConfig::parse_with_ignored("hash_length = 6\nhashLength = 7\n").unwrap();
        assert_eq!(config.hash_length, 6);
        assert_eq!(ignored, vec!["hashLength".to_string()]);
    }

    #[test]
    fn test_validate_reports_every_error() {
        let config = FingerprintConfig {
            hash_length: 0,
            assets_pattern: "url\\((".into(),
            targets: Targets::Only(vec!["js/app.js".into()]),
            ..Default::default()
        };

        let Err(ConfigError::Diagnostics(diag)) = config.validate() else {
            panic!("expected diagnostics");
        };
        let display = diag.to_string();
        let positions: Vec<_> = ["hash_length", "assets_pattern", "targets"]
            .iter()
            .map(|field| display.find(field).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_validate_rejects_long_hash() {
        let config = FingerprintConfig {
            hash_length: MAX_HASH_LENGTH + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_cli_overrides() {
        let cli = Cli::try_parse_from([
            "fingerprint",
            "--manifest",
            "out/manifest.json",
            "--public-root",
            "./out",
            "--always-run",
            "--auto-replace",
            "--force-manifest",
            "false",
        ])
        .unwrap();

        let mut config = FingerprintConfig {
            manifest_generation_force: true,
            ..Default::default()
        };
        config.apply_cli(&cli);

        assert_eq!(config.manifest, PathBuf::from("out/manifest.json"));
        assert_eq!(config.public_root_path, "./out");
        assert!(config.always_run);
        assert!(config.auto_replace_and_hash);
        assert!(!config.manifest_generation_force);
        // Not given on the command line
        assert!(!config.auto_clear_old_files);
    }

    #[test]
    fn test_default_patterns_compile() {
        let assets = Regex::new(DEFAULT_ASSETS_PATTERN).unwrap();
        assert!(assets.is_match("background: url('/img/troll.png');"));
        assert!(assets.is_match("src: url(\"../fonts/font.eot?#iefix\")"));
        assert!(assets.is_match("url(/img/x.png?v=2)"));
        assert!(!assets.is_match("url('/js/app.js')"));
        assert!(Regex::new(DEFAULT_PARAMETERS_PATTERN).is_ok());
    }
}
