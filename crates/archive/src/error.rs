//! Archive error types.

/// Errors produced while scanning a site folder or building an archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("please select a folder to deploy")]
    EmptySelection,
}
