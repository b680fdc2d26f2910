//! Reference extraction (pure, no side effects).
//!
//! Finds `url(...)` references to fonts and images inside text content and
//! splits each one into the bare asset path and its query/fragment suffix.
//!
//! ```text
//! url('../fonts/icons.eot?#iefix')
//!      └──────┬───────┘└──┬──┘
//!           path       suffix     → path "/fonts/icons.eot", suffix "?#iefix"
//! ```

use regex::{NoExpand, Regex};

use crate::config::FingerprintConfig;
use crate::utils::path::is_external_link;

/// Compiled scanning patterns for a session.
#[derive(Debug, Clone)]
pub struct Patterns {
    assets: Regex,
    parameters: Regex,
}

impl Patterns {
    pub fn new(assets: &str, parameters: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            assets: Regex::new(assets)?,
            parameters: Regex::new(parameters)?,
        })
    }

    pub fn from_config(config: &FingerprintConfig) -> Result<Self, regex::Error> {
        Self::new(&config.assets_pattern, &config.parameters_pattern)
    }

    /// Every non-overlapping reference match, in order of appearance.
    pub fn extract_references<'c>(&self, content: &'c str) -> Vec<&'c str> {
        self.assets.find_iter(content).map(|m| m.as_str()).collect()
    }

    /// Split the query/fragment suffix off a reference path.
    ///
    /// Returns `(suffix, stripped_path)`. The suffix is every parameter match
    /// concatenated in order, separators included. A leading `../` on the
    /// stripped path loses its first two characters, so `../fonts/a.woff`
    /// becomes `/fonts/a.woff`; deeper relative paths are not resolved.
    pub fn split_hash_suffix(&self, path: &str) -> (String, String) {
        let suffix: String = self
            .parameters
            .find_iter(path)
            .map(|m| m.as_str())
            .collect();

        let stripped = self.parameters.replace_all(path, "").into_owned();
        let stripped = if stripped.starts_with("../") {
            stripped[2..].to_string()
        } else {
            stripped
        };

        (suffix, stripped)
    }
}

/// Raw path inside a `url(...)` match, with quotes removed.
///
/// Takes the text between the first `(` and the last `)`.
pub fn isolate_target(raw: &str) -> String {
    let start = raw.find('(').map_or(0, |i| i + 1);
    let end = raw
        .rfind(')')
        .filter(|&end| end >= start)
        .unwrap_or(raw.len());
    raw[start..end]
        .chars()
        .filter(|c| !matches!(c, '\'' | '"'))
        .collect()
}

/// Escape every regex metacharacter so `text` matches only itself.
#[inline]
pub fn escape_literal(text: &str) -> String {
    regex::escape(text)
}

/// One occurrence of an asset reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Text as it appeared in the source (absent for plain path references).
    pub literal: Option<String>,
    /// Asset path without suffix, relative to the public root.
    pub path: String,
    /// Query/fragment suffix to carry over to the rewritten reference.
    pub suffix: String,
}

impl Reference {
    /// Parse a raw `url(...)` match.
    pub fn parse(raw: &str, patterns: &Patterns) -> Self {
        let target = isolate_target(raw);
        let (suffix, path) = patterns.split_hash_suffix(&target);
        Self {
            literal: Some(raw.to_string()),
            path,
            suffix,
        }
    }

    /// A bare public-root-relative path (directory walks, explicit lists).
    pub fn plain(path: impl Into<String>) -> Self {
        Self {
            literal: None,
            path: path.into(),
            suffix: String::new(),
        }
    }

    /// References to other hosts or inline data are left alone.
    pub fn is_external(&self) -> bool {
        is_external_link(&self.path)
    }

    /// Replace every occurrence of the original text with `replacement`.
    pub fn rewrite(&self, content: &str, replacement: &str) -> String {
        let Some(literal) = &self.literal else {
            return content.to_string();
        };
        match Regex::new(&escape_literal(literal)) {
            Ok(re) => re.replace_all(content, NoExpand(replacement)).into_owned(),
            Err(_) => content.replace(literal.as_str(), replacement),
        }
    }
}
