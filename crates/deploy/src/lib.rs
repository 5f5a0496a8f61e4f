//! Deploy orchestration: one attempt from site folder to published deploy.
//!
//! Coordinates site creation, archive construction, and upload, then polls
//! deployment status until a terminal state, emitting progress events and
//! honoring cancellation.

pub mod api;
pub mod error;
pub mod orchestrator;
pub mod types;

pub use api::HostingApi;
pub use error::DeployError;
pub use orchestrator::{DeployOrchestrator, POLL_PERIOD, POLL_TIMEOUT};
pub use types::{AttemptState, DeployEvent, DeployOutcome};
