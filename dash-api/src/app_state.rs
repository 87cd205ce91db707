use std::{sync::Arc, time::Duration};

use installs::{DemoGenerator, DemoSource, InstallSource, Roster};
use tokio_util::sync::CancellationToken;

use crate::config::{ServiceTitanSettings, Settings};

#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub servicetitan: Arc<ServiceTitanSettings>,
    pub roster: Arc<Roster>,
    pub install_source: Arc<dyn InstallSource>,
    /// Cancelled when the server starts shutting down.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        servicetitan: ServiceTitanSettings,
        roster: Roster,
        install_source: Arc<dyn InstallSource>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            servicetitan: Arc::new(servicetitan),
            roster: Arc::new(roster),
            install_source,
            shutdown,
        }
    }

    /// State backed by the demo install generator.
    pub fn from_settings(settings: &Settings, shutdown: CancellationToken) -> Self {
        let roster = settings.reports.roster.clone();
        let source = DemoSource::new(
            DemoGenerator::new(roster.clone()),
            Duration::from_millis(settings.reports.demo_latency_ms),
        );

        Self::new(
            settings.servicetitan.clone(),
            roster,
            Arc::new(source),
            shutdown,
        )
    }
}
