//! File scanning for deployment.
//!
//! Recursively walks a site folder and produces a list of file entries
//! with relative paths normalized to forward slashes.

use std::path::Path;

use crate::error::ArchiveError;

/// A file selected for deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub relative_path: String,
    pub size: u64,
}

/// Scans a directory recursively and returns file entries for deployment.
///
/// Relative paths use `/` as separator (even on Windows) so archive entry
/// names are stable across platforms. Returns the file list and total size
/// in bytes.
pub fn scan_dir(root: &Path) -> Result<(Vec<FileEntry>, u64), ArchiveError> {
    let mut files = Vec::new();
    let mut total_size: u64 = 0;

    walk_dir(root, root, &mut files, &mut total_size)?;

    Ok((files, total_size))
}

fn walk_dir(
    root: &Path,
    current: &Path,
    files: &mut Vec<FileEntry>,
    total_size: &mut u64,
) -> Result<(), ArchiveError> {
    let entries = std::fs::read_dir(current)?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;

        if metadata.is_dir() {
            walk_dir(root, &path, files, total_size)?;
        } else if metadata.is_file() {
            let rel_path = path.strip_prefix(root).map_err(std::io::Error::other)?;

            // Normalize to forward slashes.
            let rel_str = rel_path.to_string_lossy().replace('\\', "/");
            let size = metadata.len();

            files.push(FileEntry {
                relative_path: rel_str,
                size,
            });
            *total_size += size;
        }
    }

    Ok(())
}
