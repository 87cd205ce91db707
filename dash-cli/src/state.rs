use servicetitan::Technician;
use tokio_util::sync::CancellationToken;

use crate::api::DashClient;

/// Display-side narrowing of the technician list. Never changes the fetched data.
#[derive(Debug, Clone, Default)]
pub struct TechnicianFilter {
    pub search: Option<String>,
    pub active_only: bool,
}

impl TechnicianFilter {
    fn matches(&self, technician: &Technician) -> bool {
        if self.active_only && !technician.active {
            return false;
        }
        match &self.search {
            Some(search) => technician
                .name
                .to_lowercase()
                .contains(&search.to_lowercase()),
            None => true,
        }
    }
}

#[derive(Debug, Default)]
pub struct TechnicianView {
    technicians: Vec<Technician>,
    pub filter: TechnicianFilter,
}

impl TechnicianView {
    pub fn new(filter: TechnicianFilter) -> Self {
        Self {
            technicians: Vec::new(),
            filter,
        }
    }

    /// Reload the list from the API.
    ///
    /// The result replaces the current list only if `cancel` has not fired by the time the
    /// fetch completes. Returns whether the list was replaced.
    pub async fn refresh(&mut self, client: &DashClient, cancel: &CancellationToken) -> bool {
        let technicians = client.technicians().await;

        if cancel.is_cancelled() {
            tracing::debug!("technician refresh cancelled, discarding result");
            return false;
        }

        self.technicians = technicians;
        true
    }

    pub fn len(&self) -> usize {
        self.technicians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.technicians.is_empty()
    }

    pub fn visible(&self) -> Vec<&Technician> {
        self.technicians
            .iter()
            .filter(|technician| self.filter.matches(technician))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with(delay: Duration) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "technicians": [
                            { "id": 1, "name": "Ava Brooks", "active": true },
                            { "id": 2, "name": "Luis Ortega", "active": false },
                            { "id": 3, "name": "Maya Chen", "active": true }
                        ]
                    }))
                    .set_delay(delay),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn refresh_replaces_the_list() {
        let server = server_with(Duration::ZERO).await;
        let client = DashClient::new(&server.uri()).unwrap();
        let mut view = TechnicianView::default();

        assert!(view.refresh(&client, &CancellationToken::new()).await);
        assert_eq!(view.len(), 3);
    }

    #[tokio::test]
    async fn cancellation_during_fetch_keeps_the_previous_list() {
        let server = server_with(Duration::from_millis(200)).await;
        let client = DashClient::new(&server.uri()).unwrap();
        let mut view = TechnicianView::default();
        let cancel = CancellationToken::new();

        let (applied, _) = tokio::join!(view.refresh(&client, &cancel), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        });

        assert!(!applied);
        assert_eq!(view.len(), 0);
        // The request itself was not aborted.
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn filters_narrow_without_touching_the_list() {
        let server = server_with(Duration::ZERO).await;
        let client = DashClient::new(&server.uri()).unwrap();
        let mut view = TechnicianView::new(TechnicianFilter {
            search: Some("a".to_string()),
            active_only: true,
        });
        view.refresh(&client, &CancellationToken::new()).await;

        let names: Vec<_> = view.visible().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Ava Brooks", "Maya Chen"]);

        view.filter = TechnicianFilter {
            search: Some("ORTEGA".to_string()),
            active_only: false,
        };
        let names: Vec<_> = view.visible().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Luis Ortega"]);
        assert_eq!(view.len(), 3);
    }
}
