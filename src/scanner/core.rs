//! The scan engine and its single-file filter pipeline.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::filters;
use super::metadata::{MetadataProvider, OsMetadata};
use super::options::ScanOptions;
use super::types::ScanState;
use super::walk::{DirectoryWalk, FileListWalk};

/// The scan engine: applies the configured filters to directory trees and
/// explicit file lists, accumulating results into a caller-owned
/// [`ScanState`].
///
/// The engine itself is stateless between calls; everything a scan learns
/// lives in the state the caller passes in, which makes independent
/// concurrent sessions a matter of independent states.
pub struct Scanner<M: MetadataProvider = OsMetadata> {
    options: ScanOptions,
    provider: M,
}

impl Scanner<OsMetadata> {
    pub fn new(options: ScanOptions) -> Result<Self> {
        Self::with_provider(options, OsMetadata)
    }
}

impl<M: MetadataProvider> Scanner<M> {
    /// Build a scanner over a custom metadata source.
    pub fn with_provider(options: ScanOptions, provider: M) -> Result<Self> {
        options.validate()?;
        Ok(Self { options, provider })
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Walk each directory recursively, lazily yielding the running checked
    /// count at checkpoint boundaries. Each directory in `dirs` doubles as
    /// the root its records' relative paths are derived from.
    ///
    /// Listing failures are counted against the failing directory and only
    /// that subtree is abandoned; nothing here returns an error.
    pub fn scan_directories<'a>(
        &'a self,
        dirs: &[PathBuf],
        state: &'a mut ScanState,
    ) -> DirectoryWalk<'a, M> {
        DirectoryWalk::new(self, dirs.to_vec(), state)
    }

    /// Scan an explicit list of files, deriving relative paths against an
    /// arbitrary `root` (which need not exist or relate to the files).
    ///
    /// A symbolic link anywhere in the list ends the whole batch: one link
    /// skip is counted and every later entry is left unprocessed.
    pub fn scan_files<'a>(
        &'a self,
        files: &[PathBuf],
        root: &Path,
        state: &'a mut ScanState,
    ) -> FileListWalk<'a, M> {
        FileListWalk::new(self, files.to_vec(), root.to_path_buf(), state)
    }

    /// Run one entry through the filter pipeline and, when it survives,
    /// record its metadata.
    ///
    /// Predicates run in a fixed order and the first failing one wins:
    /// hidden name, include-dir, exclude-dir, include-file, exclude-file,
    /// metadata fetch, link flag, read permission, zero length.
    pub(crate) fn scan_file(&self, path: &Path, root: &Path, state: &mut ScanState) {
        state.checked += 1;

        let opts = &self.options;

        if opts.skip_hidden_files && filters::is_hidden(path) {
            state.skipped_hidden_files += 1;
            return;
        }

        let dir = path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !opts.incl_dir_regexes.is_empty() && !filters::matches_any(&opts.incl_dir_regexes, &dir)
        {
            state.skipped_include_files += 1;
            return;
        }

        // An exclude-dir hit is tallied in the include-file bucket; the
        // report format counts on this bucketing.
        if filters::matches_any(&opts.excl_dir_regexes, &dir) {
            state.skipped_include_files += 1;
            return;
        }

        if !opts.incl_file_regexes.is_empty()
            && !filters::matches_any(&opts.incl_file_regexes, &name)
        {
            state.skipped_include_files += 1;
            return;
        }

        if filters::matches_any(&opts.excl_file_regexes, &name) {
            state.skipped_exclude_files += 1;
            return;
        }

        let record = match self.provider.metadata(path, root) {
            Ok(record) => record,
            Err(err) => {
                state.record_file_error(path, &err);
                return;
            }
        };

        // Links only reveal themselves in the stat, so a link has already
        // been charged one checked unit by this point.
        if record.is_link {
            state.skipped_links += 1;
            return;
        }

        if !filters::has_read_permission(record.mode, record.uid, record.gid, opts.uid, opts.gid) {
            state.error_count += 1;
            state.file_permission_errs.insert(path.to_path_buf());
            return;
        }

        if opts.skip_zero_len && record.size == 0 {
            state.skipped_zero_len += 1;
            return;
        }

        state.accepted += 1;
        state.files.insert(path.to_path_buf(), record);
    }
}
