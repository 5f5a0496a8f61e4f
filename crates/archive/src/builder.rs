//! In-memory zip archive construction.
//!
//! The upload endpoint takes one zip payload holding the whole site, so the
//! builder never touches disk for output — it returns the finished bytes.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;

use tracing::debug;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::ArchiveError;
use crate::scanner::scan_dir;

/// Builds a deflate-compressed zip payload from (relative path, content) pairs.
///
/// Duplicate relative paths collapse to the last content supplied; entries
/// are written in path order. Fails with [`ArchiveError::EmptySelection`]
/// when no entries are given.
pub fn build_archive<I>(entries: I) -> Result<Vec<u8>, ArchiveError>
where
    I: IntoIterator<Item = (String, Vec<u8>)>,
{
    let mut by_path: BTreeMap<String, Vec<u8>> = BTreeMap::new();
    for (path, data) in entries {
        by_path.insert(path, data);
    }

    if by_path.is_empty() {
        return Err(ArchiveError::EmptySelection);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, data) in &by_path {
        writer.start_file(path.as_str(), options)?;
        writer.write_all(data)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Scans `root` and builds the archive from every file found under it.
pub fn build_from_dir(root: &Path) -> Result<Vec<u8>, ArchiveError> {
    let (files, total_size) = scan_dir(root)?;
    if files.is_empty() {
        return Err(ArchiveError::EmptySelection);
    }

    debug!(
        files = files.len(),
        total_bytes = total_size,
        "building site archive"
    );

    let mut entries = Vec::with_capacity(files.len());
    for entry in &files {
        let data = std::fs::read(root.join(&entry.relative_path))?;
        entries.push((entry.relative_path.clone(), data));
    }

    build_archive(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn entry_count(bytes: &[u8]) -> usize {
        zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap().len()
    }

    #[test]
    fn one_entry_per_path() {
        let bytes = build_archive([
            ("index.html".to_string(), b"<html></html>".to_vec()),
            ("assets/style.css".to_string(), b"body{}".to_vec()),
        ])
        .unwrap();

        assert_eq!(entry_count(&bytes), 2);
        assert_eq!(read_entry(&bytes, "index.html"), "<html></html>");
        assert_eq!(read_entry(&bytes, "assets/style.css"), "body{}");
    }

    #[test]
    fn duplicate_paths_last_write_wins() {
        let bytes = build_archive([
            ("index.html".to_string(), b"first".to_vec()),
            ("about.html".to_string(), b"about".to_vec()),
            ("index.html".to_string(), b"second".to_vec()),
        ])
        .unwrap();

        assert_eq!(entry_count(&bytes), 2);
        assert_eq!(read_entry(&bytes, "index.html"), "second");
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = build_archive(Vec::new());
        assert!(matches!(result, Err(ArchiveError::EmptySelection)));
    }

    #[test]
    fn build_from_dir_preserves_relative_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), b"<html></html>").unwrap();
        fs::create_dir_all(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("blog").join("post.html"), b"<p>hi</p>").unwrap();

        let bytes = build_from_dir(dir.path()).unwrap();

        assert_eq!(entry_count(&bytes), 2);
        assert_eq!(read_entry(&bytes, "index.html"), "<html></html>");
        assert_eq!(read_entry(&bytes, "blog/post.html"), "<p>hi</p>");
    }

    #[test]
    fn build_from_empty_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = build_from_dir(dir.path());
        assert!(matches!(result, Err(ArchiveError::EmptySelection)));
    }
}
