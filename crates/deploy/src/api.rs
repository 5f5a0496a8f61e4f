//! Hosting transport seam for the deploy flow.
//!
//! `HostingApi` is implemented by the app on top of the real hosting
//! client. Using a trait keeps deploy logic decoupled from HTTP and
//! testable with mocks.

use std::future::Future;
use std::pin::Pin;

use sitedrop_hosting::{Deployment, Site};

/// Abstract hosting API surface the orchestrator drives.
///
/// The bearer credential is an argument on every call, matching the remote
/// contract — implementations hold no token state.
pub trait HostingApi: Send + Sync {
    /// Creates a new site.
    fn create_site<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Site, sitedrop_hosting::Error>> + Send + 'a>>;

    /// Uploads an archive as a new deployment of `site_id`.
    fn upload_deployment<'a>(
        &'a self,
        token: &'a str,
        site_id: &'a str,
        archive: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<Deployment, sitedrop_hosting::Error>> + Send + 'a>>;

    /// Reads the current state of a deployment.
    fn get_deployment<'a>(
        &'a self,
        token: &'a str,
        deploy_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Deployment, sitedrop_hosting::Error>> + Send + 'a>>;
}
