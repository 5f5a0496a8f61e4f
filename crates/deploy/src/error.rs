//! Deploy error types.

/// Errors produced during a deploy attempt.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("please enter your access token")]
    MissingToken,

    #[error(transparent)]
    Archive(#[from] sitedrop_archive::ArchiveError),

    #[error(transparent)]
    Hosting(#[from] sitedrop_hosting::Error),

    #[error("deployment failed on the remote service")]
    Remote,

    #[error("deployment timed out")]
    TimedOut,

    #[error("cancelled")]
    Cancelled,

    #[error("task join error: {0}")]
    Join(String),
}
