//! Bridges the deploy orchestrator's transport seam to the real client.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sitedrop_deploy::HostingApi;
use sitedrop_hosting::{Client, Deployment, Site};

/// [`HostingApi`] implementation over the live hosting client.
pub struct ClientAdapter {
    client: Arc<Client>,
}

impl ClientAdapter {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl HostingApi for ClientAdapter {
    fn create_site<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Site, sitedrop_hosting::Error>> + Send + 'a>> {
        Box::pin(self.client.create_site(token))
    }

    fn upload_deployment<'a>(
        &'a self,
        token: &'a str,
        site_id: &'a str,
        archive: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<Deployment, sitedrop_hosting::Error>> + Send + 'a>> {
        Box::pin(self.client.upload_deployment(token, site_id, archive))
    }

    fn get_deployment<'a>(
        &'a self,
        token: &'a str,
        deploy_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Deployment, sitedrop_hosting::Error>> + Send + 'a>> {
        Box::pin(self.client.get_deployment(token, deploy_id))
    }
}
