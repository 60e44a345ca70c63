use std::path::Path;
use std::sync::Arc;

use floatwin_core::{
    EngineSettingsExt, HeadlessHost, OverlayEvent, OverlayService, ScreenSize, ServiceHandle,
};
use floatwin_types::EngineSettings;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Screen the headless host starts with, a typical portrait phone
pub const DEFAULT_SCREEN: ScreenSize = ScreenSize {
    width: 1080,
    height: 1920,
};

/// Holds all shared state for the CLI.
/// The service does the work; this only keeps the handles together.
#[derive(Clone)]
pub struct CliContext {
    pub service: ServiceHandle,
    /// Shared with the service; used to inspect surfaces and simulate the
    /// display changing
    pub host: HeadlessHost,
    pub settings: Arc<EngineSettings>,
    events_task: Arc<JoinHandle<()>>,
}

impl CliContext {
    /// Start a service with settings from `config` or the user store
    pub fn new(config: Option<&Path>) -> Result<Self, String> {
        let settings = match config {
            Some(path) => EngineSettings::load_from_path(path).map_err(|e| e.to_string())?,
            None => EngineSettings::load(),
        };
        let host = HeadlessHost::new(DEFAULT_SCREEN);
        let service = OverlayService::start(host.clone(), settings.clone());
        let events_task = tokio::spawn(log_events(service.subscribe()));

        Ok(Self {
            service,
            host,
            settings: Arc::new(settings),
            events_task: Arc::new(events_task),
        })
    }

    pub async fn shutdown(&self) {
        if let Err(e) = self.service.stop().await {
            warn!(error = %e, "service already stopped");
        }
        self.events_task.abort();
    }
}

/// Print engine notifications as they happen
async fn log_events(mut events: tokio::sync::broadcast::Receiver<OverlayEvent>) {
    loop {
        match events.recv().await {
            Ok(OverlayEvent::AllClosed) => info!("all overlays closed"),
            Ok(event) => info!(?event, "overlay event"),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "event log fell behind"),
            Err(RecvError::Closed) => break,
        }
    }
}
