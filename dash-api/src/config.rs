use std::str::FromStr;

use installs::Roster;
use serde::Deserialize;
use serde_with::serde_as;
use servicetitan::{ApiConfig, ClientCredentials, IDENTITY_URL};
use strum::{Display, EnumString};
use thiserror::Error;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub servicetitan: ServiceTitanSettings,
    #[serde(default)]
    pub reports: ReportSettings,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub app_url: String,
}

/// Credentials for the technicians proxy.
///
/// Every key is optional at startup so the server boots without them; the proxy checks them
/// on each request and answers 500 naming whatever is missing.
#[derive(Deserialize, Clone)]
pub struct ServiceTitanSettings {
    pub base_url: Option<String>,
    pub tenant_id: Option<String>,
    pub app_key: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_identity_url")]
    pub identity_url: String,
}

impl Default for ServiceTitanSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            tenant_id: None,
            app_key: None,
            client_id: None,
            client_secret: None,
            identity_url: default_identity_url(),
        }
    }
}

fn default_identity_url() -> String {
    IDENTITY_URL.to_string()
}

#[derive(Debug, Error, PartialEq)]
#[error("Missing required configuration: {}", .0.join(", "))]
pub struct MissingConfiguration(pub Vec<&'static str>);

impl ServiceTitanSettings {
    /// Split the settings into what the client needs, or list every missing key.
    pub fn resolve(&self) -> Result<(ApiConfig, ClientCredentials), MissingConfiguration> {
        let mut missing = Vec::new();
        let mut require = |key: &'static str, value: &Option<String>| match value.as_deref() {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => {
                missing.push(key);
                String::new()
            }
        };

        let base_url = require("base_url", &self.base_url);
        let tenant_id = require("tenant_id", &self.tenant_id);
        let app_key = require("app_key", &self.app_key);
        let client_id = require("client_id", &self.client_id);
        let client_secret = require("client_secret", &self.client_secret);

        if !missing.is_empty() {
            return Err(MissingConfiguration(missing));
        }

        Ok((
            ApiConfig {
                base_url,
                tenant_id,
                app_key,
            },
            ClientCredentials::new(client_id, client_secret),
        ))
    }
}

#[derive(Deserialize, Clone)]
pub struct ReportSettings {
    /// Simulated per-day delay of the demo install source.
    #[serde(default)]
    pub demo_latency_ms: u64,
    #[serde(default)]
    pub roster: Roster,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            demo_latency_ms: 0,
            roster: Roster::demo(),
        }
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .map_err(|e| config::ConfigError::Message(format!("Failed to parse APP_ENVIRONMENT: {e}")))?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(config_directory.join(environment_filename)).required(false))
        .add_source(
            config::Environment::with_prefix("DASH")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
