//! Typed payloads for the hosting API.
//!
//! Remote JSON is validated into these records at the client boundary
//! instead of being passed around as raw values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a deployment.
///
/// The remote service reports more granular names (`new`, `enqueued`,
/// `building`, `processing`, `uploading`, ...); everything that is not a
/// terminal state maps to `Building`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DeployState {
    Building,
    Ready,
    Error,
}

impl From<String> for DeployState {
    fn from(state: String) -> Self {
        match state.as_str() {
            "ready" => DeployState::Ready,
            "error" => DeployState::Error,
            _ => DeployState::Building,
        }
    }
}

/// HTML post-processing toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HtmlProcessing {
    #[serde(default)]
    pub pretty_urls: bool,
}

/// Post-processing configuration attached to a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessingSettings {
    #[serde(default)]
    pub html: HtmlProcessing,
}

/// The persistent hosting entity that owns deployments and configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default)]
    pub https_only: bool,
    #[serde(default)]
    pub build_image: String,
    #[serde(default)]
    pub processing_settings: ProcessingSettings,
}

impl Site {
    /// The patchable subset of this site's fields.
    pub fn to_patch(&self) -> SitePatch {
        SitePatch {
            name: self.name.clone(),
            ssl: self.ssl,
            https_only: self.https_only,
            build_image: self.build_image.clone(),
            processing_settings: self.processing_settings,
        }
    }
}

/// One upload-and-publish attempt of a site's files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    #[serde(default)]
    pub site_id: String,
    pub state: DeployState,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Public URL of the published deploy; only meaningful once `state`
    /// is [`DeployState::Ready`].
    #[serde(default)]
    pub deploy_url: Option<String>,
}

/// Field-granular settings update body.
///
/// The read-only `url` is deliberately absent — it is never sent back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitePatch {
    pub name: String,
    pub ssl: bool,
    pub https_only: bool,
    pub build_image: String,
    pub processing_settings: ProcessingSettings,
}
