//! Serverless-style function endpoints, served under `/.netlify/functions`.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use servicetitan::{AuthMode, ServiceTitanClient, Technician, TechnicianQuery};
use tracing::instrument;

use crate::{app_state::AppState, routes::ApiError};

pub fn router() -> Router<AppState> {
    Router::new().route("/technicians", get(technicians))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TechniciansResponse {
    path_used: String,
    auth_mode: AuthMode,
    count: usize,
    technicians: Vec<Technician>,
}

/// Exchange client credentials for a token, then fetch the first page of active technicians.
#[instrument(name = "technicians", skip(app_state))]
async fn technicians(
    State(app_state): State<AppState>,
) -> Result<Json<TechniciansResponse>, ApiError> {
    let (config, credentials) = app_state.servicetitan.resolve()?;

    let client = ServiceTitanClient::authenticate(
        app_state.http.clone(),
        config,
        &credentials,
        &app_state.servicetitan.identity_url,
    )
    .await?;
    let page = client.fetch_technicians(TechnicianQuery::default()).await?;

    tracing::debug!(count = page.count, "fetched technicians");

    Ok(Json(TechniciansResponse {
        path_used: page.path_used,
        auth_mode: client.auth_mode(),
        count: page.count,
        technicians: page.technicians,
    }))
}
