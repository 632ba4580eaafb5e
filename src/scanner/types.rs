//! Per-session scan accounting.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::metadata::FileRecord;

/// Mutable aggregate for one scan session.
///
/// Created empty, mutated exclusively by the scan engine, and read (never
/// mutated) by downstream reporting. Counters and error sets accumulate
/// monotonically across every scan driven against the same state; there is
/// no implicit reset, a fresh session means a fresh `ScanState`.
#[derive(Debug, Default, Serialize)]
pub struct ScanState {
    /// Accepted records keyed by the path they were scanned under; scanning
    /// the same path twice overwrites the earlier record.
    pub files: BTreeMap<PathBuf, FileRecord>,

    /// Every entry that entered single-file processing.
    pub checked: u64,
    /// Entries that survived every filter and were recorded.
    pub accepted: u64,
    pub skipped_links: u64,
    pub skipped_zero_len: u64,
    pub skipped_hidden_files: u64,
    pub skipped_hidden_dirs: u64,
    pub skipped_exclude_dirs: u64,
    pub skipped_include_dirs: u64,
    pub skipped_exclude_files: u64,
    pub skipped_include_files: u64,
    /// Total recorded errors across every bucket below.
    pub error_count: u64,

    pub file_permission_errs: BTreeSet<PathBuf>,
    pub file_not_found_errs: BTreeSet<PathBuf>,
    pub file_generic_errs: BTreeSet<PathBuf>,
    pub dir_permission_errs: BTreeSet<PathBuf>,
    pub dir_not_found_errs: BTreeSet<PathBuf>,
    pub dir_generic_errs: BTreeSet<PathBuf>,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a failed directory listing into its error bucket. The caller
    /// abandons only that subtree; siblings and ancestors continue.
    pub(crate) fn record_dir_error(&mut self, dir: &Path, err: &io::Error) {
        warn!(dir = %dir.display(), error = %err, "directory listing failed");
        self.error_count += 1;
        let bucket = match err.kind() {
            io::ErrorKind::PermissionDenied => &mut self.dir_permission_errs,
            io::ErrorKind::NotFound => &mut self.dir_not_found_errs,
            _ => &mut self.dir_generic_errs,
        };
        bucket.insert(dir.to_path_buf());
    }

    /// Classify a failed metadata fetch into its error bucket. The
    /// containing directory's remaining entries continue.
    pub(crate) fn record_file_error(&mut self, file: &Path, err: &io::Error) {
        warn!(file = %file.display(), error = %err, "metadata fetch failed");
        self.error_count += 1;
        let bucket = match err.kind() {
            io::ErrorKind::PermissionDenied => &mut self.file_permission_errs,
            io::ErrorKind::NotFound => &mut self.file_not_found_errs,
            _ => &mut self.file_generic_errs,
        };
        bucket.insert(file.to_path_buf());
    }
}
