//! Data types for the deploy flow.

/// Lifecycle state of one deploy attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptState {
    #[default]
    Idle,
    Building,
    Success,
    Error,
}

/// Event emitted during a deploy attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// The attempt moved to a new state.
    State(AttemptState),
    /// Synthetic progress update, 0–100.
    Progress { percent: u8, message: String },
    /// The attempt finished and the site is published.
    Completed {
        site_id: String,
        deploy_id: String,
        url: String,
    },
    /// The attempt failed.
    Failed { error: String },
}

/// Successful outcome of a deploy attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployOutcome {
    pub site_id: String,
    pub deploy_id: String,
    pub url: String,
}
