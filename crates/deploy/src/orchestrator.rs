//! Deploy orchestrator.
//!
//! Sequences site creation, archive construction, and upload, then polls
//! deployment status on a fixed period until the remote reports a terminal
//! state. Progress events go out over an mpsc channel; cancellation is a
//! `CancellationToken` scoped to the attempt.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use sitedrop_hosting::{DeployState, Site};

use crate::api::HostingApi;
use crate::error::DeployError;
use crate::types::{AttemptState, DeployEvent, DeployOutcome};

/// Fixed period between status reads.
pub const POLL_PERIOD: Duration = Duration::from_secs(3);

/// Maximum time a deploy may stay non-terminal before the attempt fails.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Synthetic progress shown right after the attempt starts.
const PROGRESS_START: u8 = 10;
/// Per-tick synthetic progress increment.
const PROGRESS_STEP: u8 = 5;
/// Synthetic progress cap until a terminal status is observed.
const PROGRESS_CEILING: u8 = 90;

/// Orchestrates a single deploy attempt.
pub struct DeployOrchestrator {
    events_tx: mpsc::Sender<DeployEvent>,
    events_rx: Option<mpsc::Receiver<DeployEvent>>,
    cancel: CancellationToken,
}

impl Default for DeployOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl DeployOrchestrator {
    /// Creates a new orchestrator.
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<DeployEvent>> {
        self.events_rx.take()
    }

    /// Returns a cancellation token for this attempt.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs one deploy attempt to completion.
    ///
    /// An empty token fails without any state change or network call; an
    /// empty folder selection fails before the first network call but after
    /// the attempt has entered the building state, matching the UI flow.
    pub async fn run(
        &self,
        api: &dyn HostingApi,
        token: &str,
        folder: PathBuf,
    ) -> Result<DeployOutcome, DeployError> {
        if token.trim().is_empty() {
            let err = DeployError::MissingToken;
            let _ = self
                .events_tx
                .send(DeployEvent::Failed {
                    error: err.to_string(),
                })
                .await;
            return Err(err);
        }

        self.set_state(AttemptState::Building).await;
        self.emit_progress(PROGRESS_START, "Starting deployment...").await;

        match self.deploy_and_poll(api, token, folder).await {
            Ok(outcome) => {
                self.emit_progress(100, "Deployment successful!").await;
                self.set_state(AttemptState::Success).await;
                let _ = self
                    .events_tx
                    .send(DeployEvent::Completed {
                        site_id: outcome.site_id.clone(),
                        deploy_id: outcome.deploy_id.clone(),
                        url: outcome.url.clone(),
                    })
                    .await;
                info!(
                    site_id = %outcome.site_id,
                    deploy_id = %outcome.deploy_id,
                    url = %outcome.url,
                    "deploy completed"
                );
                Ok(outcome)
            }
            Err(err) => {
                self.set_state(AttemptState::Error).await;
                let _ = self
                    .events_tx
                    .send(DeployEvent::Failed {
                        error: err.to_string(),
                    })
                    .await;
                error!(error = %err, "deploy failed");
                Err(err)
            }
        }
    }

    /// The attempt body: scan, create site, archive, upload, poll.
    async fn deploy_and_poll(
        &self,
        api: &dyn HostingApi,
        token: &str,
        folder: PathBuf,
    ) -> Result<DeployOutcome, DeployError> {
        self.check_cancelled()?;

        // Scan up front so an empty selection fails before any network call.
        let (files, total_size) = tokio::task::spawn_blocking({
            let folder = folder.clone();
            move || sitedrop_archive::scan_dir(&folder)
        })
        .await
        .map_err(|e| DeployError::Join(e.to_string()))??;

        if files.is_empty() {
            return Err(sitedrop_archive::ArchiveError::EmptySelection.into());
        }
        debug!(files = files.len(), total_bytes = total_size, "scan complete");

        // 1. Create the site.
        self.check_cancelled()?;
        let site = api.create_site(token).await?;
        info!(site_id = %site.id, name = %site.name, "site created");

        // 2. Build the archive off the async thread.
        self.emit_progress(PROGRESS_START, "Packaging site files...").await;
        self.check_cancelled()?;
        let archive = tokio::task::spawn_blocking({
            let folder = folder.clone();
            move || sitedrop_archive::build_from_dir(&folder)
        })
        .await
        .map_err(|e| DeployError::Join(e.to_string()))??;

        // 3. Upload it as a new deployment.
        self.emit_progress(PROGRESS_START, "Uploading archive...").await;
        self.check_cancelled()?;
        let deploy = api.upload_deployment(token, &site.id, archive).await?;
        info!(deploy_id = %deploy.id, "deployment uploaded");

        // 4. Poll until the remote reports a terminal state.
        self.poll_until_terminal(api, token, &site, &deploy.id).await
    }

    /// Polls the deployment status every [`POLL_PERIOD`] until terminal.
    ///
    /// The interval lives in this scope, so every exit path — success,
    /// failure, cancellation, timeout — drops it. Ticks are serialized:
    /// each status read completes before the next tick can fire.
    async fn poll_until_terminal(
        &self,
        api: &dyn HostingApi,
        token: &str,
        site: &Site,
        deploy_id: &str,
    ) -> Result<DeployOutcome, DeployError> {
        let mut ticker = tokio::time::interval(POLL_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a fresh interval completes immediately; consume
        // it so the first status read happens one full period after upload.
        ticker.tick().await;

        let deadline = tokio::time::Instant::now() + POLL_TIMEOUT;
        let mut percent = PROGRESS_START;

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return Err(DeployError::Cancelled),
                _ = ticker.tick() => {}
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(DeployError::TimedOut);
            }

            // Bounded synthetic progress: approaches the ceiling but never
            // passes it until a terminal status is observed.
            percent = (percent + PROGRESS_STEP).min(PROGRESS_CEILING);
            self.emit_progress(percent, "Building and deploying...").await;

            let status = tokio::select! {
                _ = self.cancel.cancelled() => return Err(DeployError::Cancelled),
                res = api.get_deployment(token, deploy_id) => res?,
            };

            match status.state {
                DeployState::Ready => {
                    let url = status.deploy_url.unwrap_or_else(|| site.url.clone());
                    return Ok(DeployOutcome {
                        site_id: site.id.clone(),
                        deploy_id: deploy_id.to_string(),
                        url,
                    });
                }
                DeployState::Error => return Err(DeployError::Remote),
                DeployState::Building => {
                    debug!(deploy_id, "deployment still building");
                }
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), DeployError> {
        if self.cancel.is_cancelled() {
            Err(DeployError::Cancelled)
        } else {
            Ok(())
        }
    }

    async fn set_state(&self, state: AttemptState) {
        let _ = self.events_tx.send(DeployEvent::State(state)).await;
    }

    async fn emit_progress(&self, percent: u8, message: &str) {
        let _ = self
            .events_tx
            .send(DeployEvent::Progress {
                percent,
                message: message.to_string(),
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    use sitedrop_hosting::Deployment;

    /// Mock hosting API with a scripted status sequence.
    struct MockApi {
        statuses: Mutex<Vec<DeployState>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MockApi {
        fn new(statuses: Vec<DeployState>) -> Self {
            Self {
                statuses: Mutex::new(statuses),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self, op: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
        }

        fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl HostingApi for MockApi {
        fn create_site<'a>(
            &'a self,
            _token: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Site, sitedrop_hosting::Error>> + Send + 'a>>
        {
            self.calls.lock().unwrap().push("create_site");
            Box::pin(async move {
                Ok(Site {
                    id: "site-1".into(),
                    name: "site-test".into(),
                    url: "https://site-test.netlify.app".into(),
                    ssl: true,
                    https_only: false,
                    build_image: String::new(),
                    processing_settings: Default::default(),
                })
            })
        }

        fn upload_deployment<'a>(
            &'a self,
            _token: &'a str,
            site_id: &'a str,
            _archive: Vec<u8>,
        ) -> Pin<Box<dyn Future<Output = Result<Deployment, sitedrop_hosting::Error>> + Send + 'a>>
        {
            self.calls.lock().unwrap().push("upload_deployment");
            let site_id = site_id.to_string();
            Box::pin(async move {
                Ok(Deployment {
                    id: "dep-1".into(),
                    site_id,
                    state: DeployState::Building,
                    created_at: None,
                    deploy_url: None,
                })
            })
        }

        fn get_deployment<'a>(
            &'a self,
            _token: &'a str,
            deploy_id: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Deployment, sitedrop_hosting::Error>> + Send + 'a>>
        {
            self.calls.lock().unwrap().push("get_deployment");
            let deploy_id = deploy_id.to_string();

            // Scripted sequence; an exhausted script keeps reporting Building.
            let state = {
                let mut statuses = self.statuses.lock().unwrap();
                if statuses.is_empty() {
                    DeployState::Building
                } else {
                    statuses.remove(0)
                }
            };

            Box::pin(async move {
                let deploy_url = match state {
                    DeployState::Ready => Some("https://deploy-1--site-test.netlify.app".into()),
                    _ => None,
                };
                Ok(Deployment {
                    id: deploy_id,
                    site_id: "site-1".into(),
                    state,
                    created_at: None,
                    deploy_url,
                })
            })
        }
    }

    fn site_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), b"<html></html>").unwrap();
        dir
    }

    fn drain(rx: &mut mpsc::Receiver<DeployEvent>) -> Vec<DeployEvent> {
        let mut events = Vec::new();
        while let Ok(e) = rx.try_recv() {
            events.push(e);
        }
        events
    }

    fn states(events: &[DeployEvent]) -> Vec<AttemptState> {
        events
            .iter()
            .filter_map(|e| match e {
                DeployEvent::State(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    fn progress_values(events: &[DeployEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                DeployEvent::Progress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn full_flow_building_building_ready() {
        let dir = site_dir();
        let api = MockApi::new(vec![
            DeployState::Building,
            DeployState::Building,
            DeployState::Ready,
        ]);

        let mut orch = DeployOrchestrator::new();
        let mut events_rx = orch.take_events().unwrap();

        let outcome = orch
            .run(&api, "test-token", dir.path().to_path_buf())
            .await
            .unwrap();

        assert_eq!(outcome.site_id, "site-1");
        assert_eq!(outcome.deploy_id, "dep-1");
        assert_eq!(outcome.url, "https://deploy-1--site-test.netlify.app");

        assert_eq!(api.call_count("create_site"), 1);
        assert_eq!(api.call_count("upload_deployment"), 1);
        // One read per tick until the terminal status, then the timer stops.
        assert_eq!(api.call_count("get_deployment"), 3);

        let events = drain(&mut events_rx);
        assert_eq!(
            states(&events),
            vec![AttemptState::Building, AttemptState::Success]
        );
        assert!(
            events
                .iter()
                .any(|e| matches!(e, DeployEvent::Completed { .. })),
        );

        // No events may arrive after the terminal one even if time advances.
        tokio::time::advance(POLL_PERIOD * 4).await;
        assert!(drain(&mut events_rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn remote_error_ends_attempt() {
        let dir = site_dir();
        let api = MockApi::new(vec![DeployState::Building, DeployState::Error]);

        let mut orch = DeployOrchestrator::new();
        let mut events_rx = orch.take_events().unwrap();

        let result = orch.run(&api, "test-token", dir.path().to_path_buf()).await;
        assert!(matches!(result, Err(DeployError::Remote)));
        assert_eq!(api.call_count("get_deployment"), 2);

        let events = drain(&mut events_rx);
        assert_eq!(
            states(&events),
            vec![AttemptState::Building, AttemptState::Error]
        );
        assert!(events.iter().any(|e| matches!(e, DeployEvent::Failed { .. })));

        // Progress never reached 100.
        assert!(progress_values(&events).iter().all(|p| *p < 100));

        // Timer is gone: advancing time produces nothing further.
        tokio::time::advance(POLL_PERIOD * 4).await;
        assert!(drain(&mut events_rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn progress_is_monotonic_and_capped() {
        let dir = site_dir();
        let mut script = vec![DeployState::Building; 25];
        script.push(DeployState::Ready);
        let api = MockApi::new(script);

        let mut orch = DeployOrchestrator::new();
        let mut events_rx = orch.take_events().unwrap();

        orch.run(&api, "test-token", dir.path().to_path_buf())
            .await
            .unwrap();

        let events = drain(&mut events_rx);
        let progress = progress_values(&events);

        let mut last = 0u8;
        for p in &progress {
            assert!(*p >= last, "progress went backwards: {last} -> {p}");
            last = *p;
        }

        // Capped at 90 until the terminal status, then snapped to 100.
        let (terminal, building): (Vec<u8>, Vec<u8>) =
            progress.iter().copied().partition(|p| *p == 100);
        assert_eq!(terminal, vec![100]);
        assert!(building.iter().all(|p| *p <= 90));
        assert!(building.contains(&90));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_token_issues_no_network_calls() {
        let dir = site_dir();
        let api = MockApi::new(Vec::new());

        let mut orch = DeployOrchestrator::new();
        let mut events_rx = orch.take_events().unwrap();

        let result = orch.run(&api, "", dir.path().to_path_buf()).await;
        assert!(matches!(result, Err(DeployError::MissingToken)));
        assert_eq!(api.total_calls(), 0);

        // The attempt never left idle.
        let events = drain(&mut events_rx);
        assert!(states(&events).is_empty());
        assert!(events.iter().any(|e| matches!(e, DeployEvent::Failed { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_folder_fails_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let api = MockApi::new(Vec::new());

        let orch = DeployOrchestrator::new();
        let result = orch.run(&api, "test-token", dir.path().to_path_buf()).await;

        assert!(matches!(
            result,
            Err(DeployError::Archive(
                sitedrop_archive::ArchiveError::EmptySelection
            ))
        ));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_before_start() {
        let dir = site_dir();
        let api = MockApi::new(Vec::new());

        let orch = DeployOrchestrator::new();
        orch.cancel_token().cancel();

        let result = orch.run(&api, "test-token", dir.path().to_path_buf()).await;
        assert!(matches!(result, Err(DeployError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_mid_poll_stops_the_timer() {
        let dir = site_dir();
        // Exhausted script: status stays Building forever.
        let api = Arc::new(MockApi::new(Vec::new()));

        let mut orch = DeployOrchestrator::new();
        let mut events_rx = orch.take_events().unwrap();
        let cancel = orch.cancel_token();
        let orch = Arc::new(orch);

        let task = tokio::spawn({
            let orch = Arc::clone(&orch);
            let api = Arc::clone(&api);
            let folder = dir.path().to_path_buf();
            async move { orch.run(api.as_ref(), "test-token", folder).await }
        });

        // Let a few polls happen, then cancel.
        let mut seen_progress = 0;
        while seen_progress < 3 {
            if let Some(DeployEvent::Progress { .. }) = events_rx.recv().await {
                seen_progress += 1;
            }
        }
        cancel.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(DeployError::Cancelled)));

        let polls = api.call_count("get_deployment");
        tokio::time::advance(POLL_PERIOD * 4).await;
        assert_eq!(api.call_count("get_deployment"), polls);
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_deploy_times_out() {
        let dir = site_dir();
        let api = Arc::new(MockApi::new(Vec::new()));

        let mut orch = DeployOrchestrator::new();
        let mut events_rx = orch.take_events().unwrap();
        let orch = Arc::new(orch);

        let task = tokio::spawn({
            let orch = Arc::clone(&orch);
            let api = Arc::clone(&api);
            let folder = dir.path().to_path_buf();
            async move { orch.run(api.as_ref(), "test-token", folder).await }
        });

        // Drain events until the attempt fails.
        let mut failed_message = None;
        while let Some(event) = events_rx.recv().await {
            if let DeployEvent::Failed { error } = event {
                failed_message = Some(error);
                break;
            }
        }

        let result = task.await.unwrap();
        assert!(matches!(result, Err(DeployError::TimedOut)));
        assert!(failed_message.unwrap().contains("timed out"));
    }
}
