//! Command-line interface module.

mod args;

pub use args::Cli;

use anyhow::{Context, Result};
use std::io::{self, BufRead};

use crate::config::FingerprintConfig;
use crate::engine::{Fingerprinter, GeneratedFile};
use crate::{debug, log};

/// Run one fingerprinting batch for the files named on the command line.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = FingerprintConfig::load(cli)?;
    let files = collect_files(cli)?;
    if files.is_empty() {
        log!("fingerprint"; "no files given");
    }

    let mut fingerprinter = Fingerprinter::new(config, cli.env.as_str())?;
    if !fingerprinter.is_fingerprintable() {
        log!(
            "fingerprint";
            "`{}` is not a fingerprinted environment, names left unchanged",
            cli.env
        );
    }

    let last = fingerprinter
        .process_batch(&files)
        .await
        .context("fingerprinting failed")?;

    let map = fingerprinter.map();
    log!("fingerprint"; "{} assets mapped, {} renamed", map.len(), map.renamed_count());
    if fingerprinter.is_fingerprintable() || fingerprinter.config().manifest_generation_force {
        log!("manifest"; "{}", fingerprinter.config().manifest.display());
    }
    if let Some(last) = last {
        debug!("fingerprint"; "last target: {}", last.display());
    }
    Ok(())
}

/// Files from arguments, or one path per line from stdin for `-`.
fn collect_files(cli: &Cli) -> Result<Vec<GeneratedFile>> {
    if cli.reads_stdin() {
        return parse_file_list(io::stdin().lock()).context("failed to read file list from stdin");
    }
    Ok(cli.files.iter().cloned().map(GeneratedFile::from).collect())
}

fn parse_file_list(reader: impl BufRead) -> io::Result<Vec<GeneratedFile>> {
    let mut files = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            files.push(GeneratedFile::new(line));
        }
    }
    Ok(files)
}
