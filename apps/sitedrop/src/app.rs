//! Application state and update logic.
//!
//! The UI thread owns `App`; background work runs on the tokio runtime and
//! reports back through an mpsc channel drained once per frame.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use sitedrop_deploy::{AttemptState, DeployEvent, DeployOrchestrator};
use sitedrop_hosting::{
    Client, Deployment, HtmlProcessing, ProcessingSettings, Site, SitePatch,
};

use crate::adapter::ClientAdapter;
use crate::config::AppConfig;
use crate::notice::NoticeQueue;

/// Top-level tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Deploy,
    History,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Deploy, Tab::History, Tab::Settings];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Deploy => "Deploy",
            Tab::History => "History",
            Tab::Settings => "Settings",
        }
    }

    /// History and settings only make sense once a site exists.
    pub fn requires_site(self) -> bool {
        !matches!(self, Tab::Deploy)
    }

    fn next(self) -> Tab {
        match self {
            Tab::Deploy => Tab::History,
            Tab::History => Tab::Settings,
            Tab::Settings => Tab::Deploy,
        }
    }

    fn prev(self) -> Tab {
        match self {
            Tab::Deploy => Tab::Settings,
            Tab::History => Tab::Deploy,
            Tab::Settings => Tab::History,
        }
    }
}

/// Focusable element on the deploy tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployField {
    Token,
    Folder,
    DeployButton,
    ResetButton,
    CopyUrl,
}

/// Focusable element on the settings tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Name,
    Ssl,
    HttpsOnly,
    PrettyUrls,
    BuildImage,
    Save,
    Reload,
}

impl SettingsField {
    const ALL: [SettingsField; 7] = [
        SettingsField::Name,
        SettingsField::Ssl,
        SettingsField::HttpsOnly,
        SettingsField::PrettyUrls,
        SettingsField::BuildImage,
        SettingsField::Save,
        SettingsField::Reload,
    ];

    fn cycle(self, forward: bool) -> SettingsField {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        let len = Self::ALL.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::ALL[next]
    }
}

/// Editable settings form state.
#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    pub name: String,
    pub url: String,
    pub ssl: bool,
    pub https_only: bool,
    pub pretty_urls: bool,
    pub build_image: String,
    pub loaded: bool,
}

impl SettingsForm {
    fn from_site(site: &Site) -> Self {
        Self {
            name: site.name.clone(),
            url: site.url.clone(),
            ssl: site.ssl,
            https_only: site.https_only,
            pretty_urls: site.processing_settings.html.pretty_urls,
            build_image: site.build_image.clone(),
            loaded: true,
        }
    }

    fn to_patch(&self) -> SitePatch {
        SitePatch {
            name: self.name.clone(),
            ssl: self.ssl,
            https_only: self.https_only,
            build_image: self.build_image.clone(),
            processing_settings: ProcessingSettings {
                html: HtmlProcessing {
                    pretty_urls: self.pretty_urls,
                },
            },
        }
    }
}

/// Deploy attempt view state.
#[derive(Debug, Clone, Default)]
pub struct AttemptView {
    pub state: AttemptState,
    pub percent: u8,
    pub message: String,
    pub url: String,
}

/// Messages from background tasks to the UI thread.
pub enum AppMsg {
    Deploy(DeployEvent),
    DeployFinished,
    History(Result<Vec<Deployment>, String>),
    SettingsLoaded(Result<Site, String>),
    SettingsSaved(Result<Site, String>),
    Redeployed(Result<(), String>),
}

/// Top-level application state.
pub struct App {
    pub quit: bool,
    pub tab: Tab,

    // Deploy tab
    pub token_input: String,
    pub folder_input: String,
    pub deploy_focus: DeployField,
    pub attempt: AttemptView,
    pub deploying: bool,

    // History tab
    pub history: Vec<Deployment>,
    pub history_loading: bool,
    pub history_state: ListState,
    pub redeploying: bool,

    // Settings tab
    pub settings: SettingsForm,
    pub settings_loading: bool,
    pub settings_saving: bool,
    pub settings_focus: SettingsField,

    /// Site created on first deploy; empty until then.
    pub site_id: String,

    pub notices: NoticeQueue,

    config: AppConfig,
    client: Arc<Client>,
    rt: tokio::runtime::Handle,
    msg_tx: Sender<AppMsg>,
    msg_rx: Receiver<AppMsg>,
    deploy_cancel: Option<CancellationToken>,
}

impl App {
    pub fn new(
        config: AppConfig,
        client: Arc<Client>,
        rt: tokio::runtime::Handle,
        initial_folder: Option<String>,
    ) -> Self {
        let (msg_tx, msg_rx) = std::sync::mpsc::channel();
        Self {
            quit: false,
            tab: Tab::Deploy,
            token_input: config.api_token.clone(),
            folder_input: initial_folder.unwrap_or_default(),
            deploy_focus: DeployField::Token,
            attempt: AttemptView::default(),
            deploying: false,
            history: Vec::new(),
            history_loading: false,
            history_state: ListState::default(),
            redeploying: false,
            settings: SettingsForm::default(),
            settings_loading: false,
            settings_saving: false,
            settings_focus: SettingsField::Name,
            site_id: config.site_id.clone(),
            notices: NoticeQueue::new(),
            config,
            client,
            rt,
            msg_tx,
            msg_rx,
            deploy_cancel: None,
        }
    }

    /// Whether the history and settings tabs have a site to work against.
    pub fn has_site_context(&self) -> bool {
        !self.site_id.is_empty() && !self.token_input.is_empty()
    }

    /// Cancels any in-flight attempt and persists config. Called on exit.
    pub fn shutdown(&mut self) {
        if let Some(cancel) = self.deploy_cancel.take() {
            cancel.cancel();
        }
        self.persist_config();
    }

    fn persist_config(&mut self) {
        self.config.api_token = self.token_input.clone();
        self.config.site_id = self.site_id.clone();
        if let Err(e) = self.config.save() {
            warn!(error = %e, "failed to save config");
        }
    }

    // -----------------------------------------------------------------
    // Input handling
    // -----------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.switch_tab(self.tab.next());
                return;
            }
            KeyCode::BackTab => {
                self.switch_tab(self.tab.prev());
                return;
            }
            KeyCode::Esc => {
                self.quit = true;
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Deploy => self.handle_deploy_key(key),
            Tab::History => self.handle_history_key(key),
            Tab::Settings => self.handle_settings_key(key),
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if !tab.requires_site() || !self.has_site_context() {
            return;
        }
        // Mirror the original views: load on entry.
        match tab {
            Tab::History if self.history.is_empty() => self.refresh_history(),
            Tab::Settings if !self.settings.loaded => self.load_settings(),
            _ => {}
        }
    }

    fn handle_deploy_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.deploy_focus = self.cycle_deploy_field(false),
            KeyCode::Down => self.deploy_focus = self.cycle_deploy_field(true),
            KeyCode::Enter => match self.deploy_focus {
                DeployField::Token | DeployField::Folder => {
                    self.deploy_focus = self.cycle_deploy_field(true);
                }
                DeployField::DeployButton => self.start_deploy(),
                DeployField::ResetButton => self.reset_attempt(),
                DeployField::CopyUrl => self.copy_deploy_url(),
            },
            KeyCode::Backspace => match self.deploy_focus {
                DeployField::Token => {
                    self.token_input.pop();
                }
                DeployField::Folder => {
                    self.folder_input.pop();
                }
                _ => {}
            },
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                match self.deploy_focus {
                    DeployField::Token => self.token_input.push(c),
                    DeployField::Folder => self.folder_input.push(c),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn deploy_fields(&self) -> Vec<DeployField> {
        let mut fields = vec![
            DeployField::Token,
            DeployField::Folder,
            DeployField::DeployButton,
            DeployField::ResetButton,
        ];
        if !self.attempt.url.is_empty() {
            fields.push(DeployField::CopyUrl);
        }
        fields
    }

    fn cycle_deploy_field(&self, forward: bool) -> DeployField {
        let fields = self.deploy_fields();
        let idx = fields
            .iter()
            .position(|f| *f == self.deploy_focus)
            .unwrap_or(0);
        let len = fields.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        fields[next]
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.refresh_history(),
            KeyCode::Up => self.move_history_selection(-1),
            KeyCode::Down => self.move_history_selection(1),
            KeyCode::Enter | KeyCode::Char('d') => self.redeploy_selected(),
            _ => {}
        }
    }

    fn move_history_selection(&mut self, delta: isize) {
        if self.history.is_empty() {
            return;
        }
        let len = self.history.len() as isize;
        let current = self.history_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len - 1);
        self.history_state.select(Some(next as usize));
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.settings_focus = self.settings_focus.cycle(false),
            KeyCode::Down => self.settings_focus = self.settings_focus.cycle(true),
            KeyCode::Enter => match self.settings_focus {
                SettingsField::Name | SettingsField::BuildImage => {
                    self.settings_focus = self.settings_focus.cycle(true);
                }
                SettingsField::Ssl => self.settings.ssl = !self.settings.ssl,
                SettingsField::HttpsOnly => self.settings.https_only = !self.settings.https_only,
                SettingsField::PrettyUrls => {
                    self.settings.pretty_urls = !self.settings.pretty_urls;
                }
                SettingsField::Save => self.save_settings(),
                SettingsField::Reload => self.load_settings(),
            },
            KeyCode::Backspace => match self.settings_focus {
                SettingsField::Name => {
                    self.settings.name.pop();
                }
                SettingsField::BuildImage => {
                    self.settings.build_image.pop();
                }
                _ => {}
            },
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                match self.settings_focus {
                    SettingsField::Name => self.settings.name.push(c),
                    SettingsField::BuildImage => self.settings.build_image.push(c),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------

    fn start_deploy(&mut self) {
        if self.deploying {
            return;
        }
        if self.folder_input.trim().is_empty() {
            self.notices.error("Please select a folder to deploy");
            return;
        }

        self.attempt = AttemptView::default();

        let mut orch = DeployOrchestrator::new();
        let Some(mut events_rx) = orch.take_events() else {
            return;
        };
        self.deploy_cancel = Some(orch.cancel_token());
        self.deploying = true;

        // Persist the token for the next launch.
        self.persist_config();

        let tx = self.msg_tx.clone();
        let events_tx = self.msg_tx.clone();
        let token = self.token_input.clone();
        let folder = PathBuf::from(self.folder_input.trim());
        let api = ClientAdapter::new(Arc::clone(&self.client));

        self.rt.spawn(async move {
            let forward = tokio::spawn(async move {
                while let Some(event) = events_rx.recv().await {
                    if events_tx.send(AppMsg::Deploy(event)).is_err() {
                        break;
                    }
                }
            });

            let _ = orch.run(&api, &token, folder).await;

            // Dropping the orchestrator closes the event channel.
            drop(orch);
            let _ = forward.await;
            let _ = tx.send(AppMsg::DeployFinished);
        });
    }

    fn reset_attempt(&mut self) {
        if let Some(cancel) = self.deploy_cancel.take() {
            cancel.cancel();
        }
        self.attempt = AttemptView::default();
        self.folder_input.clear();
    }

    fn copy_deploy_url(&mut self) {
        if self.attempt.url.is_empty() {
            return;
        }
        match crate::clipboard::copy_text(&self.attempt.url) {
            Ok(()) => {
                self.notices.success("URL copied to clipboard!");
            }
            Err(e) => {
                self.notices.error(e.to_string());
            }
        }
    }

    fn refresh_history(&mut self) {
        if self.history_loading || !self.has_site_context() {
            return;
        }
        self.history_loading = true;

        let tx = self.msg_tx.clone();
        let client = Arc::clone(&self.client);
        let token = self.token_input.clone();
        let site_id = self.site_id.clone();

        self.rt.spawn(async move {
            let result = client
                .list_deployments(&token, &site_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMsg::History(result));
        });
    }

    fn redeploy_selected(&mut self) {
        if self.redeploying || !self.has_site_context() {
            return;
        }
        let Some(idx) = self.history_state.selected() else {
            return;
        };
        let Some(deploy) = self.history.get(idx) else {
            return;
        };
        self.redeploying = true;

        let tx = self.msg_tx.clone();
        let client = Arc::clone(&self.client);
        let token = self.token_input.clone();
        let site_id = self.site_id.clone();
        let deploy_id = deploy.id.clone();

        self.rt.spawn(async move {
            let result = client
                .restore_deployment(&token, &site_id, &deploy_id)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMsg::Redeployed(result));
        });
    }

    fn load_settings(&mut self) {
        if self.settings_loading || !self.has_site_context() {
            return;
        }
        self.settings_loading = true;

        let tx = self.msg_tx.clone();
        let client = Arc::clone(&self.client);
        let token = self.token_input.clone();
        let site_id = self.site_id.clone();

        self.rt.spawn(async move {
            let result = client
                .get_site(&token, &site_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMsg::SettingsLoaded(result));
        });
    }

    fn save_settings(&mut self) {
        if self.settings_saving || !self.settings.loaded || !self.has_site_context() {
            return;
        }
        self.settings_saving = true;

        let tx = self.msg_tx.clone();
        let client = Arc::clone(&self.client);
        let token = self.token_input.clone();
        let site_id = self.site_id.clone();
        let patch = self.settings.to_patch();

        self.rt.spawn(async move {
            let result = client
                .update_site(&token, &site_id, &patch)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppMsg::SettingsSaved(result));
        });
    }

    // -----------------------------------------------------------------
    // Background message handling
    // -----------------------------------------------------------------

    /// Applies everything background tasks produced since the last frame.
    pub fn drain_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.apply_message(msg);
        }
    }

    fn apply_message(&mut self, msg: AppMsg) {
        match msg {
            AppMsg::Deploy(event) => self.apply_deploy_event(event),
            AppMsg::DeployFinished => {
                self.deploying = false;
                self.deploy_cancel = None;
            }
            AppMsg::History(Ok(list)) => {
                self.history_loading = false;
                self.history = list;
                if self.history_state.selected().is_none() && !self.history.is_empty() {
                    self.history_state.select(Some(0));
                }
            }
            AppMsg::History(Err(error)) => {
                self.history_loading = false;
                warn!(%error, "failed to load deployment history");
                self.notices.error("Failed to load deployment history");
            }
            AppMsg::SettingsLoaded(Ok(site)) => {
                self.settings_loading = false;
                self.config.site_name = site.name.clone();
                self.settings = SettingsForm::from_site(&site);
            }
            AppMsg::SettingsLoaded(Err(error)) => {
                self.settings_loading = false;
                warn!(%error, "failed to load site settings");
                self.notices.error("Failed to load site settings");
            }
            AppMsg::SettingsSaved(Ok(site)) => {
                self.settings_saving = false;
                // The form adopts the server's returned values, not the
                // locally-optimistic ones.
                self.settings = SettingsForm::from_site(&site);
                self.notices.success("Site settings updated successfully");
            }
            AppMsg::SettingsSaved(Err(error)) => {
                self.settings_saving = false;
                warn!(%error, "failed to update site settings");
                self.notices.error("Failed to update site settings");
            }
            AppMsg::Redeployed(Ok(())) => {
                self.redeploying = false;
                self.notices.success("Redeployment triggered");
                self.refresh_history();
            }
            AppMsg::Redeployed(Err(error)) => {
                self.redeploying = false;
                warn!(%error, "failed to trigger redeployment");
                self.notices.error("Failed to trigger redeployment");
            }
        }
    }

    fn apply_deploy_event(&mut self, event: DeployEvent) {
        match event {
            DeployEvent::State(state) => self.attempt.state = state,
            DeployEvent::Progress { percent, message } => {
                self.attempt.percent = percent;
                self.attempt.message = message;
            }
            DeployEvent::Completed { site_id, url, .. } => {
                self.attempt.url = url;
                self.site_id = site_id;
                self.persist_config();
                self.notices.success("Deployment successful!");
            }
            DeployEvent::Failed { error } => {
                self.notices.error(error);
            }
        }
    }
}
