//! Filesystem scanning engine
//!
//! The engine is split into stateless filter predicates ([`filters`]), the
//! metadata collaborator ([`metadata`]), immutable configuration
//! ([`options`]), the per-session accounting aggregate ([`types`]), the
//! single-file pipeline ([`core`]), and the lazy walk iterators ([`walk`]).

pub mod core;
pub mod filters;
pub mod metadata;
pub mod options;
pub mod types;
pub mod walk;

pub use self::core::Scanner;
pub use metadata::{FileRecord, MetadataProvider, OsMetadata};
pub use options::ScanOptions;
pub use types::ScanState;
pub use walk::{DirectoryWalk, FileListWalk};
