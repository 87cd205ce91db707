//! Standalone check of the technicians endpoint using an operator-supplied bearer token.

use anyhow::{bail, Result};
use servicetitan::{
    AccessToken, ApiConfig, ServiceTitanClient, ServiceTitanError, TechnicianQuery,
};

const REQUIRED_VARS: [&str; 4] = ["ST_BASE_URL", "ST_TENANT_ID", "ST_APP_KEY", "ST_BEARER_TOKEN"];

#[derive(Debug)]
pub struct ProbeSettings {
    pub config: ApiConfig,
    pub token: AccessToken,
}

impl ProbeSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let values: Vec<Option<String>> = REQUIRED_VARS
            .iter()
            .map(|key| lookup(*key).filter(|value| !value.trim().is_empty()))
            .collect();

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| *key)
            .collect();
        if !missing.is_empty() {
            bail!("Missing required environment: {}", missing.join(", "));
        }

        let mut values = values.into_iter().flatten();
        let mut next = || values.next().unwrap_or_default();

        Ok(Self {
            config: ApiConfig {
                base_url: next(),
                tenant_id: next(),
                app_key: next(),
            },
            token: AccessToken::new(next()),
        })
    }
}

pub async fn run(settings: ProbeSettings) -> Result<()> {
    let client =
        ServiceTitanClient::with_bearer(reqwest::Client::new(), settings.config, settings.token);

    match client.fetch_technicians(TechnicianQuery::default()).await {
        Ok(page) => {
            println!("OK {} ({} technicians)", page.path_used, page.count);
            for technician in &page.technicians {
                println!("  {} {}", technician.id, technician.name);
            }
            Ok(())
        }
        Err(ServiceTitanError::Upstream { status, body }) => {
            println!("{}", body);
            bail!("Technicians request failed with status {}", status)
        }
        Err(e) => Err(e.into()),
    }
}
