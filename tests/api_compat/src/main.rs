fn main() {
    println!("Run `cargo test -p api-compat` to execute API wire-compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use sitedrop_hosting::{DeployState, Deployment, Site};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture file as a string.
    fn load_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    // --- Site payloads ---

    #[test]
    fn fixture_site_parses_with_unknown_fields() {
        let site: Site = serde_json::from_str(&load_fixture("site.json"))
            .expect("site fixture should deserialize");

        assert_eq!(site.id, "4f8b2c6e-0d9a-4a0e-9c3b-1f2e3d4c5b6a");
        assert_eq!(site.name, "site-0a1b2c3d4e5f60718293a4b5c6d7e8f9");
        assert!(site.url.starts_with("https://"));
        assert!(site.ssl);
        assert!(site.https_only);
        assert_eq!(site.build_image, "noble");
        // Nested processing settings survive the extra css/js/images blocks.
        assert!(site.processing_settings.html.pretty_urls);
    }

    #[test]
    fn fixture_site_patch_excludes_read_only_url() {
        let site: Site = serde_json::from_str(&load_fixture("site.json")).unwrap();
        let json = serde_json::to_string(&site.to_patch()).unwrap();

        assert!(!json.contains("\"url\""));
        assert!(json.contains("\"https_only\":true"));
        assert!(json.contains("\"pretty_urls\":true"));
    }

    // --- Deployment payloads ---

    #[test]
    fn fixture_deployment_ready() {
        let deploy: Deployment = serde_json::from_str(&load_fixture("deployment_ready.json"))
            .expect("ready fixture should deserialize");

        assert_eq!(deploy.state, DeployState::Ready);
        assert_eq!(deploy.site_id, "4f8b2c6e-0d9a-4a0e-9c3b-1f2e3d4c5b6a");
        assert!(deploy.deploy_url.as_deref().unwrap().contains("--site-"));
        assert!(deploy.created_at.is_some());
    }

    #[test]
    fn fixture_deployment_enqueued_maps_to_building() {
        let deploy: Deployment =
            serde_json::from_str(&load_fixture("deployment_enqueued.json")).unwrap();

        assert_eq!(deploy.state, DeployState::Building);
        assert!(deploy.deploy_url.is_none());
    }

    #[test]
    fn fixture_deployment_error() {
        let deploy: Deployment =
            serde_json::from_str(&load_fixture("deployment_error.json")).unwrap();

        assert_eq!(deploy.state, DeployState::Error);
        assert!(deploy.deploy_url.is_none());
    }

    #[test]
    fn fixture_deployment_list_order_is_preserved() {
        let deploys: Vec<Deployment> =
            serde_json::from_str(&load_fixture("deployment_list.json")).unwrap();

        // The client imposes no sort; order stays as the remote sent it.
        let ids: Vec<&str> = deploys.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "77a2b3c4d5e6f7a8b9c0d1e2",
                "66f1a2b3c4d5e6f7a8b9c0d1",
                "88b3c4d5e6f7a8b9c0d1e2f3",
            ]
        );

        let states: Vec<DeployState> = deploys.iter().map(|d| d.state).collect();
        assert_eq!(
            states,
            vec![DeployState::Building, DeployState::Ready, DeployState::Error]
        );
    }
}
