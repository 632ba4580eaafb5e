//! Lazy traversal iterators.
//!
//! Both walkers yield checkpoints: the running checked count, produced every
//! `report_frequency`-th checked file (and, for the directory walk, after
//! every directory-level skip so progress stays visible in skip-heavy
//! trees). The caller drives iteration; dropping a walker mid-scan leaves
//! the session state at a valid partial value.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::core::Scanner;
use super::filters;
use super::metadata::MetadataProvider;
use super::types::ScanState;

struct Frame {
    entries: fs::ReadDir,
    dir: PathBuf,
}

/// Depth-first walk over a set of directory roots.
///
/// The recursion lives on an explicit frame stack, so arbitrarily deep trees
/// cost heap, not call stack. Symbolic links to directories are not
/// followed; they flow through single-file processing like any other
/// non-directory entry.
pub struct DirectoryWalk<'a, M: MetadataProvider> {
    scanner: &'a Scanner<M>,
    state: &'a mut ScanState,
    roots: std::vec::IntoIter<PathBuf>,
    root: PathBuf,
    stack: Vec<Frame>,
}

impl<'a, M: MetadataProvider> DirectoryWalk<'a, M> {
    pub(crate) fn new(
        scanner: &'a Scanner<M>,
        roots: Vec<PathBuf>,
        state: &'a mut ScanState,
    ) -> Self {
        Self {
            scanner,
            state,
            roots: roots.into_iter(),
            root: PathBuf::new(),
            stack: Vec::new(),
        }
    }

    /// Open a directory listing and push it. A failure is charged to the
    /// directory itself and only that subtree is abandoned.
    fn push_dir(&mut self, dir: PathBuf) {
        match fs::read_dir(&dir) {
            Ok(entries) => self.stack.push(Frame { entries, dir }),
            Err(err) => self.state.record_dir_error(&dir, &err),
        }
    }

    /// Directory-level filters, in order: hidden name, include miss,
    /// exclude hit. Returns true when the directory was skipped (and
    /// counted); every skip is a checkpoint boundary for the caller.
    fn skip_dir(&mut self, path: &Path) -> bool {
        let opts = self.scanner.options();

        if opts.skip_hidden_dirs && filters::is_hidden(path) {
            self.state.skipped_hidden_dirs += 1;
            return true;
        }

        let candidate = path.to_string_lossy();
        if !opts.incl_dir_regexes.is_empty()
            && !filters::matches_any(&opts.incl_dir_regexes, &candidate)
        {
            self.state.skipped_include_dirs += 1;
            return true;
        }
        if filters::matches_any(&opts.excl_dir_regexes, &candidate) {
            self.state.skipped_exclude_dirs += 1;
            return true;
        }

        false
    }
}

impl<M: MetadataProvider> Iterator for DirectoryWalk<'_, M> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        loop {
            let entry = match self.stack.last_mut() {
                Some(frame) => frame.entries.next(),
                None => {
                    // Current tree exhausted; move to the next root, which
                    // also becomes the reference for relative paths.
                    let root = self.roots.next()?;
                    debug!(root = %root.display(), "scanning directory tree");
                    self.root.clone_from(&root);
                    self.push_dir(root);
                    continue;
                }
            };

            match entry {
                None => {
                    self.stack.pop();
                }
                Some(Err(err)) => {
                    // A listing failure mid-iteration abandons the rest of
                    // this directory only; siblings and ancestors continue.
                    if let Some(frame) = self.stack.pop() {
                        self.state.record_dir_error(&frame.dir, &err);
                    }
                }
                Some(Ok(entry)) => {
                    let path = entry.path();
                    // file_type() does not traverse symlinks, so a link to a
                    // directory is treated as a plain entry here.
                    let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);

                    if is_dir && !self.scanner.options().skip_sub_dirs {
                        if self.skip_dir(&path) {
                            return Some(self.state.checked);
                        }
                        self.push_dir(path);
                    } else {
                        self.scanner.scan_file(&path, &self.root, self.state);
                        if self.state.checked % self.scanner.options().report_frequency == 0 {
                            return Some(self.state.checked);
                        }
                    }
                }
            }
        }
    }
}

/// Scan over an explicit file list against an arbitrary root.
pub struct FileListWalk<'a, M: MetadataProvider> {
    scanner: &'a Scanner<M>,
    state: &'a mut ScanState,
    files: std::vec::IntoIter<PathBuf>,
    root: PathBuf,
    halted: bool,
}

impl<'a, M: MetadataProvider> FileListWalk<'a, M> {
    pub(crate) fn new(
        scanner: &'a Scanner<M>,
        files: Vec<PathBuf>,
        root: PathBuf,
        state: &'a mut ScanState,
    ) -> Self {
        Self {
            scanner,
            state,
            files: files.into_iter(),
            root,
            halted: false,
        }
    }
}

impl<M: MetadataProvider> Iterator for FileListWalk<'_, M> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.halted {
            return None;
        }
        loop {
            let path = self.files.next()?;

            // A link anywhere in the list ends the whole batch: one link
            // skip is counted and every remaining entry stays unprocessed.
            // Probed before single-file processing, so the entry is never
            // charged as checked.
            if is_symlink(&path) {
                debug!(file = %path.display(), "link in file list, batch ends");
                self.state.skipped_links += 1;
                self.halted = true;
                return None;
            }

            self.scanner.scan_file(&path, &self.root, self.state);
            if self.state.checked % self.scanner.options().report_frequency == 0 {
                return Some(self.state.checked);
            }
        }
    }
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::options::ScanOptions;
    use regex::Regex;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn scanner_with(options: ScanOptions) -> Scanner {
        Scanner::new(options).unwrap()
    }

    fn options(report_frequency: u64) -> ScanOptions {
        ScanOptions {
            report_frequency,
            ..ScanOptions::default()
        }
    }

    fn compile(raw: &[&str]) -> Vec<Regex> {
        raw.iter().map(|p| Regex::new(p).unwrap()).collect()
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn walk_accepts_files_across_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "top.txt", "x");
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write(&sub, "nested.txt", "y");

        let scanner = scanner_with(options(1));
        let mut state = ScanState::new();
        let checkpoints: Vec<u64> = scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut state)
            .collect();

        assert_eq!(state.checked, 2);
        assert_eq!(state.accepted, 2);
        assert_eq!(checkpoints, vec![1, 2]);
        let rel: Vec<_> = state.files.values().map(|r| r.rel_path.clone()).collect();
        assert!(rel.contains(&PathBuf::from("top.txt")));
        assert!(rel.contains(&PathBuf::from("sub/nested.txt")));
    }

    #[test]
    fn checkpoint_cadence_follows_report_frequency() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..5 {
            write(temp_dir.path(), &format!("f{i}.txt"), "x");
        }

        let scanner = scanner_with(options(2));
        let mut state = ScanState::new();
        let checkpoints: Vec<u64> = scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut state)
            .collect();

        // Five files at a cadence of two: checkpoints at 2 and 4 only.
        assert_eq!(checkpoints, vec![2, 4]);
        assert_eq!(state.checked, 5);
    }

    #[test]
    fn hidden_directories_are_pruned_with_descendants() {
        let temp_dir = TempDir::new().unwrap();
        let hidden = temp_dir.path().join(".cache");
        fs::create_dir(&hidden).unwrap();
        write(&hidden, "buried.txt", "x");
        write(temp_dir.path(), "visible.txt", "x");

        let opts = ScanOptions {
            skip_hidden_dirs: true,
            ..options(1)
        };
        let scanner = scanner_with(opts);
        let mut state = ScanState::new();
        let checkpoints: Vec<u64> = scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut state)
            .collect();

        assert_eq!(state.skipped_hidden_dirs, 1);
        assert_eq!(state.accepted, 1);
        assert_eq!(state.checked, 1);
        // The directory skip is a checkpoint of its own.
        assert_eq!(checkpoints.len(), 2);
    }

    #[test]
    fn include_dir_regex_prunes_unmatched_subtrees() {
        let temp_dir = TempDir::new().unwrap();
        let keep = temp_dir.path().join("keep_zone");
        let other = temp_dir.path().join("other_zone");
        fs::create_dir(&keep).unwrap();
        fs::create_dir(&other).unwrap();
        write(&keep, "a.txt", "x");
        write(&other, "b.txt", "x");

        let opts = ScanOptions {
            incl_dir_regexes: compile(&["keep_zone"]),
            ..options(1)
        };
        let scanner = scanner_with(opts);
        let mut state = ScanState::new();
        scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut state)
            .for_each(drop_checkpoint);

        assert_eq!(state.skipped_include_dirs, 1);
        assert_eq!(state.accepted, 1);
        assert!(state.files.keys().all(|p| p.starts_with(&keep)));
    }

    #[test]
    fn exclude_dir_regex_prunes_matching_subtrees() {
        let temp_dir = TempDir::new().unwrap();
        let cache = temp_dir.path().join("cache");
        fs::create_dir(&cache).unwrap();
        write(&cache, "b.txt", "x");
        write(temp_dir.path(), "a.txt", "x");

        let opts = ScanOptions {
            excl_dir_regexes: compile(&["cache"]),
            ..options(1)
        };
        let scanner = scanner_with(opts);
        let mut state = ScanState::new();
        scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut state)
            .for_each(drop_checkpoint);

        assert_eq!(state.skipped_exclude_dirs, 1);
        assert_eq!(state.checked, 1);
        assert_eq!(state.accepted, 1);
    }

    #[test]
    fn skip_sub_dirs_stops_recursion_but_still_checks_the_entry() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write(&sub, "unreached.txt", "x");
        write(temp_dir.path(), "top.txt", "x");

        let opts = ScanOptions {
            skip_sub_dirs: true,
            ..options(1)
        };
        let scanner = scanner_with(opts);
        let mut state = ScanState::new();
        scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut state)
            .for_each(drop_checkpoint);

        // The subdirectory itself goes through single-file processing; its
        // contents are never visited.
        assert_eq!(state.checked, 2);
        assert!(!state.files.contains_key(&sub.join("unreached.txt")));
    }

    #[test]
    fn missing_root_is_a_not_found_dir_error() {
        let scanner = scanner_with(options(1));
        let mut state = ScanState::new();
        let missing = PathBuf::from("/definitely/not/here");
        scanner
            .scan_directories(&[missing.clone()], &mut state)
            .for_each(drop_checkpoint);

        assert_eq!(state.checked, 0);
        assert_eq!(state.error_count, 1);
        assert!(state.dir_not_found_errs.contains(&missing));
    }

    #[test]
    fn unreadable_subdir_does_not_stop_siblings() {
        if unsafe { libc::geteuid() } == 0 {
            // Root ignores permission bits; nothing to observe.
            return;
        }

        let temp_dir = TempDir::new().unwrap();
        let open_a = temp_dir.path().join("a");
        let locked = temp_dir.path().join("b_locked");
        let open_c = temp_dir.path().join("c");
        for dir in [&open_a, &locked, &open_c] {
            fs::create_dir(dir).unwrap();
        }
        write(&open_a, "a.txt", "x");
        write(&open_c, "c.txt", "x");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let scanner = scanner_with(options(1));
        let mut state = ScanState::new();
        scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut state)
            .for_each(drop_checkpoint);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();

        assert!(state.dir_permission_errs.contains(&locked));
        assert_eq!(state.accepted, 2);
    }

    #[test]
    fn deep_trees_walk_without_deep_call_stacks() {
        let temp_dir = TempDir::new().unwrap();
        let mut dir = temp_dir.path().to_path_buf();
        for i in 0..128 {
            dir = dir.join(format!("d{i}"));
        }
        fs::create_dir_all(&dir).unwrap();
        write(&dir, "bottom.txt", "x");

        let scanner = scanner_with(options(1));
        let mut state = ScanState::new();
        scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut state)
            .for_each(drop_checkpoint);

        assert_eq!(state.accepted, 1);
    }

    #[test]
    fn rescanning_a_static_tree_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.txt", "aa");
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write(&sub, "b.txt", "bb");

        let scanner = scanner_with(options(1));
        let mut first = ScanState::new();
        let mut second = ScanState::new();
        scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut first)
            .for_each(drop_checkpoint);
        scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut second)
            .for_each(drop_checkpoint);

        assert_eq!(first.checked, second.checked);
        assert_eq!(first.accepted, second.accepted);
        let first_keys: Vec<_> = first.files.keys().collect();
        let second_keys: Vec<_> = second.files.keys().collect();
        assert_eq!(first_keys, second_keys);
    }

    #[test]
    fn state_accumulates_across_scans_on_one_session() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.txt", "x");

        let scanner = scanner_with(options(1));
        let mut state = ScanState::new();
        scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut state)
            .for_each(drop_checkpoint);
        scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut state)
            .for_each(drop_checkpoint);

        assert_eq!(state.checked, 2);
        assert_eq!(state.accepted, 2);
        assert_eq!(state.files.len(), 1);
    }

    #[test]
    fn file_list_scan_derives_relative_paths_from_the_given_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = write(temp_dir.path(), "loose.txt", "x");

        let scanner = scanner_with(options(1));
        let mut state = ScanState::new();
        let checkpoints: Vec<u64> = scanner
            .scan_files(&[file.clone()], temp_dir.path(), &mut state)
            .collect();

        assert_eq!(checkpoints, vec![1]);
        assert_eq!(state.files[&file].rel_path, PathBuf::from("loose.txt"));
    }

    #[test]
    fn link_in_file_list_truncates_the_batch() {
        let temp_dir = TempDir::new().unwrap();
        let a = write(temp_dir.path(), "a.txt", "x");
        let c = write(temp_dir.path(), "c.txt", "x");
        let target = write(temp_dir.path(), "target.txt", "x");
        let link = temp_dir.path().join("link.txt");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let scanner = scanner_with(options(1));
        let mut state = ScanState::new();
        scanner
            .scan_files(&[a.clone(), link, c.clone()], temp_dir.path(), &mut state)
            .for_each(drop_checkpoint);

        // The link is never charged as checked, and c.txt is abandoned.
        assert_eq!(state.checked, 1);
        assert_eq!(state.skipped_links, 1);
        assert!(state.files.contains_key(&a));
        assert!(!state.files.contains_key(&c));
    }

    #[test]
    fn zero_length_files_never_produce_records_when_skipped() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "full.txt", "x");
        write(temp_dir.path(), "empty.txt", "");

        let scanner = scanner_with(options(1));
        let mut state = ScanState::new();
        scanner
            .scan_directories(&[temp_dir.path().to_path_buf()], &mut state)
            .for_each(drop_checkpoint);

        assert_eq!(state.skipped_zero_len, 1);
        assert!(state.files.values().all(|r| r.size > 0));
    }

    fn drop_checkpoint(_checked: u64) {}
}
