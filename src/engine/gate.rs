//! Eligibility gate.
//!
//! A single predicate decides whether files are renamed at all and whether
//! the manifest is written (the latter can also be forced separately).

/// True iff `environment` is in the allow-list, or `always_run` is set.
#[inline]
pub fn is_fingerprintable(environment: &str, environments: &[String], always_run: bool) -> bool {
    always_run || environments.iter().any(|env| env == environment)
}
