use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ServiceTitanError;

/// Identity endpoint for the client-credentials grant.
pub const IDENTITY_URL: &str = "https://auth.servicetitan.io/connect/token";

/// How a client got hold of its bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Token obtained through the client-credentials exchange.
    OAuth,
    /// Token supplied directly by the operator.
    Bearer,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::OAuth => write!(f, "oauth"),
            AuthMode::Bearer => write!(f, "bearer"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// A short-lived bearer token. Requested fresh for every request cycle, never cached.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_in: Option<u64>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_in: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Lifetime in seconds, if the identity endpoint reported one.
    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    pub(crate) fn bearer_header(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

// Keep the token out of logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"***")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Exchange the id/secret pair for an access token at `identity_url`.
    ///
    /// Non-success responses come back as [`ServiceTitanError::Upstream`] carrying the
    /// original status and body. Nothing is retried.
    pub async fn exchange(
        &self,
        http: &Client,
        identity_url: &str,
    ) -> Result<AccessToken, ServiceTitanError> {
        tracing::debug!(url = %identity_url, client_id = %self.client_id, "requesting access token");

        let resp = http
            .post(identity_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ServiceTitanError::ResponseError(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, "token exchange failed");
            return Err(ServiceTitanError::Upstream { status, body });
        }

        let token = resp.json::<TokenResponse>().await.map_err(|e| {
            ServiceTitanError::ParsingError(format!("Failed to parse token response: {}", e))
        })?;

        Ok(AccessToken {
            value: token.access_token,
            expires_in: token.expires_in,
        })
    }
}
