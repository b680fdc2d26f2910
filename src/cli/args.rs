//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Fingerprint generated build output and write an asset manifest
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Generated files to fingerprint. Use `-` to read paths from stdin.
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: fingerprint.toml, searched upward from cwd)
    #[arg(short = 'C', long, default_value = "fingerprint.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Current build environment, checked against `environments`
    #[arg(short, long, env = "FINGERPRINT_ENV", default_value = "development")]
    pub env: String,

    /// Manifest output path
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Public root directory that served asset paths are relative to
    #[arg(short, long = "public-root", value_hint = clap::ValueHint::DirPath)]
    pub public_root: Option<String>,

    /// Fingerprint in every environment
    #[arg(short, long = "always-run", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub always_run: Option<bool>,

    /// Rewrite and fingerprint font/image references inside stylesheets
    #[arg(short = 'r', long = "auto-replace", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub auto_replace: Option<bool>,

    /// Write the manifest even when the environment is not fingerprinted
    #[arg(short = 'f', long = "force-manifest", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub force_manifest: Option<bool>,

    /// Remove previously fingerprinted copies of each generated file
    #[arg(long = "clear-old", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub clear_old: Option<bool>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if the file list should be read from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.files.len() == 1 && self.files[0].as_os_str() == "-"
    }
}
