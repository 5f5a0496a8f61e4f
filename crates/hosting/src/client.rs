//! Hosting API client.
//!
//! Async HTTP client using `reqwest`. The bearer credential is supplied by
//! the caller on every call — the client keeps no token, no session, and
//! performs no retries.

use serde::Deserialize;
use tracing::debug;

use crate::types::{Deployment, Site, SitePatch};

const DEFAULT_BASE_URL: &str = "https://api.netlify.com/api/v1";

/// Errors from the hosting client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error body shape the remote API returns on failure.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Hosting API client.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a new client against the default API endpoint.
    pub fn new() -> Result<Self, Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Sets a custom base URL (for testing).
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Converts a non-success response into [`Error::Api`], carrying the
    /// remote-provided message when the body has one, else `fallback`.
    async fn check(resp: reqwest::Response, fallback: &str) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("{fallback}: {status}"));

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Creates a new site with a generated unique name and SSL enabled.
    ///
    /// Not idempotent: every call creates another site.
    pub async fn create_site(&self, token: &str) -> Result<Site, Error> {
        let name = generate_site_name();
        debug!(%name, "creating site");

        let body = serde_json::json!({ "name": name, "ssl": true });
        let resp = self
            .http
            .post(format!("{}/sites", self.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let resp = Self::check(resp, "failed to create site").await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Uploads a site archive as a new deployment.
    ///
    /// The archive goes up as multipart form data with a single binary part
    /// named `file`. The remote side accepts synchronously and processes
    /// the deploy asynchronously — poll [`get_deployment`](Self::get_deployment)
    /// for the outcome.
    pub async fn upload_deployment(
        &self,
        token: &str,
        site_id: &str,
        archive: Vec<u8>,
    ) -> Result<Deployment, Error> {
        debug!(site_id, bytes = archive.len(), "uploading deployment");

        let part = reqwest::multipart::Part::bytes(archive)
            .file_name("site.zip")
            .mime_str("application/zip")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(format!("{}/sites/{site_id}/deploys", self.base_url))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let resp = Self::check(resp, "failed to upload site files").await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Reads the current state of one deployment.
    pub async fn get_deployment(&self, token: &str, deploy_id: &str) -> Result<Deployment, Error> {
        let resp = self
            .http
            .get(format!("{}/deploys/{deploy_id}", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = Self::check(resp, "failed to get deployment status").await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Lists a site's deployments, in whatever order the remote returns.
    pub async fn list_deployments(
        &self,
        token: &str,
        site_id: &str,
    ) -> Result<Vec<Deployment>, Error> {
        let resp = self
            .http
            .get(format!("{}/sites/{site_id}/deploys", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = Self::check(resp, "failed to get deployment history").await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetches a site's details and settings.
    pub async fn get_site(&self, token: &str, site_id: &str) -> Result<Site, Error> {
        let resp = self
            .http
            .get(format!("{}/sites/{site_id}", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = Self::check(resp, "failed to get site details").await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Updates a site's settings and returns the server's view of the site.
    pub async fn update_site(
        &self,
        token: &str,
        site_id: &str,
        patch: &SitePatch,
    ) -> Result<Site, Error> {
        let resp = self
            .http
            .patch(format!("{}/sites/{site_id}", self.base_url))
            .bearer_auth(token)
            .json(patch)
            .send()
            .await?;
        let resp = Self::check(resp, "failed to update site settings").await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Republishes a past deployment ("redeploy").
    pub async fn restore_deployment(
        &self,
        token: &str,
        site_id: &str,
        deploy_id: &str,
    ) -> Result<Deployment, Error> {
        debug!(site_id, deploy_id, "restoring deployment");

        let resp = self
            .http
            .post(format!(
                "{}/sites/{site_id}/deploys/{deploy_id}/restore",
                self.base_url
            ))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = Self::check(resp, "failed to trigger redeployment").await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Generates a unique site name for first-time deploys.
fn generate_site_name() -> String {
    format!("site-{}", uuid::Uuid::new_v4().simple())
}
