//! Path string utilities.
//!
//! Pure functions on path strings. No filesystem access.
//!
//! Map keys and values are plain strings with forward slashes, so these
//! helpers work on `&str` rather than `Path`:
//! - `normalize_separators` - `\` to `/`
//! - `relativize_to_public_root` - drop anything before the public root marker
//! - `strip_prefix` - remove the first literal occurrence of a prefix
//! - `join_normalized` - lexical join with `.`/`..` resolution
//! - `public_url` - server-absolute URL for a path under the public root
//! - `is_external_link` - scheme or protocol-relative URLs

use std::path::Path;

/// Convert platform backslashes to forward slashes.
///
/// # Examples
/// ```
/// use fingerprint_assets::utils::path::normalize_separators;
/// assert_eq!(normalize_separators(r"c:\Users\me\project"), "c:/Users/me/project");
/// ```
#[inline]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Lossy string form of a filesystem path with forward slashes.
#[inline]
pub fn path_to_string(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
}

/// Drop any prefix that comes before the public root marker.
///
/// This is a literal substring search, not a path-aware prefix check: if the
/// normalized `public_root` occurs at the very start, or not at all, the path
/// is returned unchanged; otherwise everything before its first occurrence is
/// removed. A root string that appears incidentally inside a longer path
/// segment will still match.
///
/// # Examples
/// ```
/// use fingerprint_assets::utils::path::relativize_to_public_root;
/// assert_eq!(
///     relativize_to_public_root("/home/me/site/public/img/a.png", "public"),
///     "public/img/a.png"
/// );
/// assert_eq!(relativize_to_public_root("img/a.png", "public"), "img/a.png");
/// ```
pub fn relativize_to_public_root(path: &str, public_root: &str) -> String {
    let path = normalize_separators(path);
    let root = normalize_separators(public_root);
    if root.is_empty() {
        return path;
    }
    match path.find(&root) {
        Some(0) | None => path,
        Some(index) => path[index..].to_string(),
    }
}

/// Remove the first literal occurrence of `prefix` (not anchored).
///
/// An empty prefix leaves the path untouched.
#[inline]
pub fn strip_prefix(path: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }
    path.replacen(prefix, "", 1)
}

/// Lexically normalize a `/`-separated path.
///
/// Removes `.` segments and duplicate separators, collapses `..` against the
/// preceding segment. Leading `..` of a relative path are kept; on an absolute
/// path they are dropped. An empty result becomes `.`.
pub fn normalize(path: &str) -> String {
    let path = normalize_separators(path);
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Join `rel` onto `base` and normalize the result.
///
/// A leading `/` on `rel` does not reset to the filesystem root: reference
/// paths like `/img/a.png` are relative to the public root.
///
/// # Examples
/// ```
/// use fingerprint_assets::utils::path::join_normalized;
/// assert_eq!(join_normalized("./public", "/img/troll.png"), "public/img/troll.png");
/// ```
pub fn join_normalized(base: &str, rel: &str) -> String {
    match (base.is_empty(), rel.is_empty()) {
        (true, true) => ".".to_string(),
        (true, false) => normalize(rel),
        (false, true) => normalize(base),
        (false, false) => normalize(&format!("{base}/{rel}")),
    }
}

/// Server-absolute URL of a path located under the public root.
///
/// Strips the normalized public root from the front of `path` and re-adds a
/// single leading `/`.
///
/// # Examples
/// ```
/// use fingerprint_assets::utils::path::public_url;
/// assert_eq!(public_url("public/img/troll-5f2d5cbe.png", "./public"), "/img/troll-5f2d5cbe.png");
/// ```
pub fn public_url(path: &str, public_root: &str) -> String {
    let path = normalize_separators(path);
    let root = normalize(public_root);
    let rest = if root == "." {
        path.as_str()
    } else {
        path.strip_prefix(root.as_str()).unwrap_or(&path)
    };
    format!("/{}", rest.trim_start_matches('/'))
}

/// Check if a link points off-site (has a URL scheme, or is protocol-relative).
///
/// # Examples
/// ```
/// use fingerprint_assets::utils::path::is_external_link;
/// assert!(is_external_link("https://cdn.example.com/logo.png"));
/// assert!(is_external_link("//cdn.example.com/logo.png"));
/// assert!(!is_external_link("/img/logo.png"));
/// assert!(!is_external_link("../fonts/a.woff"));
/// ```
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.starts_with("//")
        || link.find(':').is_some_and(|pos| {
            pos > 0
                && link[..pos]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        })
}
