//! Site folder scanning and zip archive construction.
//!
//! Produces the single compressed payload the deploy upload expects:
//! every selected file keyed by its forward-slash relative path.

pub mod builder;
pub mod error;
pub mod scanner;

pub use builder::{build_archive, build_from_dir};
pub use error::ArchiveError;
pub use scanner::{FileEntry, scan_dir};
