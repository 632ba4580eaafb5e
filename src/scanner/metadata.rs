//! Metadata collaborator: per-file attribute collection.

use serde::Serialize;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

/// Metadata captured for one accepted file.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Path the entry was scanned under.
    pub path: PathBuf,
    /// Path relative to the caller-supplied root; falls back to the full
    /// path when the root is unrelated.
    pub rel_path: PathBuf,
    /// Leaf name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Owning user id.
    pub uid: u32,
    /// Owning group id.
    pub gid: u32,
    /// Raw mode bits, permission bits included.
    pub mode: u32,
    /// Whether the entry is a symbolic link.
    pub is_link: bool,
    /// Modification time in seconds since the epoch. Together with `size`
    /// this is the cheap fingerprint downstream comparison tools key on.
    pub mtime: i64,
}

/// Source of per-file metadata for the scan engine.
///
/// Every failure is recoverable from the engine's point of view: a
/// [`io::ErrorKind::NotFound`] means the entry vanished between listing and
/// stat, and any other kind lands in the matching file error bucket. Nothing
/// returned here ever aborts a scan.
pub trait MetadataProvider {
    fn metadata(&self, path: &Path, root: &Path) -> io::Result<FileRecord>;
}

/// The production provider, backed by `symlink_metadata` so links are
/// reported as links rather than resolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsMetadata;

impl MetadataProvider for OsMetadata {
    fn metadata(&self, path: &Path, root: &Path) -> io::Result<FileRecord> {
        let meta = std::fs::symlink_metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(FileRecord {
            path: path.to_path_buf(),
            rel_path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
            name,
            size: meta.size(),
            uid: meta.uid(),
            gid: meta.gid(),
            mode: meta.mode(),
            is_link: meta.file_type().is_symlink(),
            mtime: meta.mtime(),
        })
    }
}
