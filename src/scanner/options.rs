//! Immutable scan configuration.

use anyhow::{Context, Result, ensure};
use regex::Regex;

/// Configuration for a scan: constructed once, read-only thereafter.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Do not recurse into subdirectories. Directory entries then flow
    /// through single-file processing like any other entry.
    pub skip_sub_dirs: bool,
    /// Skip files whose leaf name starts with a dot.
    pub skip_hidden_files: bool,
    /// Skip directories whose leaf name starts with a dot, descendants
    /// included.
    pub skip_hidden_dirs: bool,
    /// Skip zero-length files. On by default.
    pub skip_zero_len: bool,
    /// A non-empty include list means "must match at least one"; an empty
    /// list means no restriction on that axis.
    pub incl_dir_regexes: Vec<Regex>,
    /// Anything matching an exclude pattern is dropped; empty means no
    /// restriction.
    pub excl_dir_regexes: Vec<Regex>,
    pub incl_file_regexes: Vec<Regex>,
    pub excl_file_regexes: Vec<Regex>,
    /// Checkpoint cadence: one progress item per this many checked files.
    /// Must be positive.
    pub report_frequency: u64,
    /// User id the read-permission check evaluates against.
    pub uid: u32,
    /// Group id the read-permission check evaluates against.
    pub gid: u32,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            skip_sub_dirs: false,
            skip_hidden_files: false,
            skip_hidden_dirs: false,
            skip_zero_len: true,
            incl_dir_regexes: Vec::new(),
            excl_dir_regexes: Vec::new(),
            incl_file_regexes: Vec::new(),
            excl_file_regexes: Vec::new(),
            report_frequency: 10,
            uid: process_uid(),
            gid: process_gid(),
        }
    }
}

impl ScanOptions {
    /// Rejects configurations the walkers cannot honor.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.report_frequency > 0, "report_frequency must be positive");
        Ok(())
    }
}

/// Effective user id of the running process.
pub fn process_uid() -> u32 {
    unsafe { libc::geteuid() }
}

/// Effective group id of the running process.
pub fn process_gid() -> u32 {
    unsafe { libc::getegid() }
}

/// Compile a list of user-supplied patterns, failing on the first invalid
/// one so a bad filter is a construction-time error, not a runtime surprise.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("invalid regex pattern '{p}'")))
        .collect()
}
