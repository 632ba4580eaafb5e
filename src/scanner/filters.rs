//! Stateless filter predicates used by the scan engine.
//!
//! Pure functions with no shared state, safe to call from anywhere.

use regex::Regex;
use std::path::Path;

/// Returns true if at least one pattern finds a match anywhere within
/// `candidate` (unanchored search, not full-match).
///
/// An empty pattern slice never matches; what an empty list *means* is up to
/// the caller (the scan engine reads an empty include or exclude list as "no
/// restriction" on that axis).
pub fn matches_any(patterns: &[Regex], candidate: &str) -> bool {
    patterns.iter().any(|re| re.is_match(candidate))
}

/// Returns true if the leaf component of `path` begins with a dot.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Evaluates read access for exactly one permission class, in precedence
/// order: owner when `file_uid` matches, else group when `file_gid` matches,
/// else other. The owner class wins even when the group or other bits are
/// more permissive. Supplementary group membership is not consulted.
pub fn has_read_permission(mode: u32, file_uid: u32, file_gid: u32, uid: u32, gid: u32) -> bool {
    if file_uid == uid {
        return mode & (libc::S_IRUSR as u32) != 0;
    }
    if file_gid == gid {
        return mode & (libc::S_IRGRP as u32) != 0;
    }
    mode & (libc::S_IROTH as u32) != 0
}
