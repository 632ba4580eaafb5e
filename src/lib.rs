//! # Scour - Permission-Aware Filesystem Scanning
//!
//! Scour walks directory trees and explicit file lists, collecting per-file
//! metadata while applying configurable skip policies: hidden entries,
//! zero-length files, regex path filters, and POSIX read-permission checks.
//!
//! ## Features
//!
//! - **Lazy progress**: traversal is an iterator of checkpoints, so callers
//!   see progress (and can stop pulling) at their own pace
//! - **Non-fatal errors**: permission, not-found, and generic I/O failures
//!   are counted and recorded per path, never raised mid-scan
//! - **Session accounting**: a caller-owned [`ScanState`] accumulates results
//!   and counters monotonically across multiple scans
//!
//! ## Quick Start
//!
//! ```no_run
//! use scour::{ScanOptions, ScanState, Scanner};
//!
//! # fn example() -> anyhow::Result<()> {
//! let scanner = Scanner::new(ScanOptions::default())?;
//! let mut state = ScanState::new();
//! for checked in scanner.scan_directories(&["/var/log".into()], &mut state) {
//!     println!("Scanned {checked} files");
//! }
//! println!("accepted {} files", state.accepted);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod scanner;

pub use cli::Cli;
pub use scanner::{FileRecord, ScanOptions, ScanState, Scanner};

/// Result type alias for scour operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
