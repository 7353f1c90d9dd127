//! Path arithmetic for source references
//!
//! Source references are slash-separated strings: relative paths, absolute
//! paths or URLs. They are manipulated textually so that composed maps stay
//! portable, without consulting the filesystem.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a URL prefix up to and including its authority, e.g. `http://host`
static URL_AUTHORITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^/]*").unwrap());

/// Matches any `scheme:` prefix, which makes a reference absolute
static URL_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap());

/// Whether `path` is an absolute path or a URL
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || URL_SCHEME.is_match(path)
}

/// Directory part of `path`
///
/// Returns an empty string for a bare file name and `/` for a file at the root.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Fold `.` and `..` segments and collapse repeated separators
///
/// Leading `..` segments of a relative path are kept. For absolute paths and
/// URLs, `..` never climbs above the root.
pub fn normalize(path: &str) -> String {
    let (prefix, rest) = match URL_AUTHORITY.find(path) {
        Some(m) => (&path[..m.end()], &path[m.end()..]),
        None => ("", path),
    };
    let rooted = !prefix.is_empty() || rest.starts_with('/');
    let trailing_slash = rest.len() > 1 && rest.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut result = String::with_capacity(path.len());
    result.push_str(prefix);
    if rooted {
        result.push('/');
    }
    result.push_str(&segments.join("/"));
    if trailing_slash && !segments.is_empty() {
        result.push('/');
    }
    if result.is_empty() {
        result.push('.');
    }
    result
}

/// Resolve `path` against the directory `base`
///
/// Absolute paths and URLs are returned normalized but otherwise unchanged;
/// they are never rebased.
pub fn join(base: &str, path: &str) -> String {
    if is_absolute(path) || base.is_empty() {
        return normalize(path);
    }
    if path.is_empty() {
        return normalize(base);
    }
    normalize(&format!("{}/{}", base.trim_end_matches('/'), path))
}
