use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use servicetitan::Technician;

const TECHNICIANS_PATH: &str = "/.netlify/functions/technicians";

#[derive(Debug, Deserialize)]
struct TechniciansPayload {
    technicians: Vec<Technician>,
}

/// Client for the dashboard API.
#[derive(Debug, Clone)]
pub struct DashClient {
    client: Client,
    base_url: String,
}

impl DashClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Url::parse(base_url).with_context(|| format!("Invalid API URL: {}", base_url))?;
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Technicians from the proxy function.
    ///
    /// Never fails: network errors, error statuses and unexpected payloads all come back as
    /// an empty list.
    pub async fn technicians(&self) -> Vec<Technician> {
        match self.try_technicians().await {
            Ok(technicians) => technicians,
            Err(e) => {
                tracing::warn!("Failed to load technicians: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn try_technicians(&self) -> Result<Vec<Technician>> {
        let url = self.url(TECHNICIANS_PATH);
        tracing::debug!(%url, "fetching technicians");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to call technicians")?
            .error_for_status()
            .context("technicians returned error")?;

        let payload: TechniciansPayload = response
            .json()
            .await
            .context("Unexpected technicians payload")?;

        Ok(payload.technicians)
    }
}
