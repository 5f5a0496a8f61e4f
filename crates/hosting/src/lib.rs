//! Hosting service API client.
//!
//! Typed async client for the site-hosting REST API: site creation, archive
//! deploys, status reads, deploy history, and site settings. The bearer
//! credential is an argument to every call — nothing here holds a session.

pub mod client;
pub mod types;

pub use client::{Client, Error};
pub use types::{DeployState, Deployment, HtmlProcessing, ProcessingSettings, Site, SitePatch};
