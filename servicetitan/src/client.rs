use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    AccessToken, AuthMode, ClientCredentials, RawTechnicianPage, ServiceTitanURL, TechnicianPage,
    TechnicianQuery,
};

const APP_KEY_HEADER: &str = "ST-App-Key";

/// Where and as whom to call the API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub tenant_id: String,
    pub app_key: String,
}

pub struct ServiceTitanClient {
    http: Client,
    config: ApiConfig,
    token: AccessToken,
    auth_mode: AuthMode,
}

impl ServiceTitanClient {
    /// Build a client around a token the operator already holds.
    pub fn with_bearer(http: Client, config: ApiConfig, token: AccessToken) -> Self {
        Self {
            http,
            config,
            token,
            auth_mode: AuthMode::Bearer,
        }
    }

    /// Run the client-credentials exchange, then build a client around the fresh token.
    pub async fn authenticate(
        http: Client,
        config: ApiConfig,
        credentials: &ClientCredentials,
        identity_url: &str,
    ) -> Result<Self, ServiceTitanError> {
        let token = credentials.exchange(&http, identity_url).await?;

        Ok(Self {
            http,
            config,
            token,
            auth_mode: AuthMode::OAuth,
        })
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    fn tenant_path(&self, path: &str) -> String {
        format!(
            "/settings/v2/tenant/{}/{}",
            self.config.tenant_id,
            path.trim_start_matches('/')
        )
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: impl AsRef<str>,
    ) -> Result<T, ServiceTitanError> {
        tracing::debug!(url = %url.as_ref(), auth_mode = %self.auth_mode, "fetching");

        let resp = self
            .http
            .get(url.as_ref())
            .header(reqwest::header::AUTHORIZATION, self.token.bearer_header())
            .header(APP_KEY_HEADER, &self.config.app_key)
            .send()
            .await
            .map_err(|e| ServiceTitanError::ResponseError(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, "upstream request failed");
            return Err(ServiceTitanError::Upstream { status, body });
        }

        resp.json::<T>().await.map_err(|e| {
            ServiceTitanError::ParsingError(format!("Failed to parse response as JSON: {}", e))
        })
    }

    /// Fetch a single page of technicians.
    pub async fn fetch_technicians(
        &self,
        query: TechnicianQuery,
    ) -> Result<TechnicianPage, ServiceTitanError> {
        let path_used = self.tenant_path("technicians");
        let url = ServiceTitanURL::new(&self.config.base_url)
            .append_path(&path_used)
            .with_query("active", query.active)
            .with_query("page", query.page)
            .with_query("pageSize", query.page_size);

        let raw: RawTechnicianPage = self.fetch(url).await?;

        Ok(TechnicianPage {
            path_used,
            count: raw.data.len(),
            has_more: raw.has_more,
            technicians: raw.data,
        })
    }
}

#[derive(Error, Debug)]
pub enum ServiceTitanError {
    #[error("Upstream returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },
    #[error("ResponseError: {0}")]
    ResponseError(String),
    #[error("ParsingError: {0}")]
    ParsingError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: String) -> ApiConfig {
        ApiConfig {
            base_url,
            tenant_id: "1234".to_string(),
            app_key: "ak-1".to_string(),
        }
    }

    #[tokio::test]
    async fn fetch_technicians_sends_token_app_key_and_fixed_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/settings/v2/tenant/1234/technicians"))
            .and(query_param("active", "true"))
            .and(query_param("page", "1"))
            .and(query_param("pageSize", "200"))
            .and(header("authorization", "Bearer tok-1"))
            .and(header("st-app-key", "ak-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": 1,
                "pageSize": 200,
                "hasMore": false,
                "data": [
                    { "id": 1, "name": "Ava Brooks", "active": true },
                    { "id": 2, "name": "Luis Ortega", "active": true }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ServiceTitanClient::with_bearer(
            Client::new(),
            config(mock_server.uri()),
            AccessToken::new("tok-1"),
        );
        let page = client
            .fetch_technicians(TechnicianQuery::default())
            .await
            .unwrap();

        assert_eq!(page.count, 2);
        assert_eq!(page.path_used, "/settings/v2/tenant/1234/technicians");
        assert_eq!(page.technicians[1].name, "Luis Ortega");
        assert_eq!(client.auth_mode(), AuthMode::Bearer);
    }

    #[tokio::test]
    async fn authenticate_then_fetch_uses_exchanged_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/connect/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh-token"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/settings/v2/tenant/1234/technicians"))
            .and(header("authorization", "Bearer fresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let identity_url = format!("{}/connect/token", mock_server.uri());
        let client = ServiceTitanClient::authenticate(
            Client::new(),
            config(mock_server.uri()),
            &ClientCredentials::new("id", "secret"),
            &identity_url,
        )
        .await
        .unwrap();
        let page = client
            .fetch_technicians(TechnicianQuery::default())
            .await
            .unwrap();

        assert_eq!(client.auth_mode(), AuthMode::OAuth);
        assert_eq!(page.count, 0);
    }

    #[tokio::test]
    async fn upstream_failure_is_propagated_without_retry() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("App key rejected"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ServiceTitanClient::with_bearer(
            Client::new(),
            config(mock_server.uri()),
            AccessToken::new("tok-1"),
        );
        let err = client
            .fetch_technicians(TechnicianQuery::default())
            .await
            .unwrap_err();

        match err {
            ServiceTitanError::Upstream { status, body } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(body, "App key rejected");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_data_array_is_a_parsing_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": []
            })))
            .mount(&mock_server)
            .await;

        let client = ServiceTitanClient::with_bearer(
            Client::new(),
            config(mock_server.uri()),
            AccessToken::new("tok-1"),
        );
        let err = client
            .fetch_technicians(TechnicianQuery::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceTitanError::ParsingError(_)));
    }
}
