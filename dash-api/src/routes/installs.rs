use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use installs::{
    export_file_name, load_installs, to_csv_string, DateSelection, GroupMode, InstallRecord,
    Report, ReportFilter, SummaryRow,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{app_state::AppState, routes::ApiError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_installs))
        .route("/report", get(report))
        .route("/export", get(export))
}

#[derive(Debug, Deserialize)]
struct SelectionQuery {
    date: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

impl SelectionQuery {
    fn selection(&self) -> Result<DateSelection, ApiError> {
        Ok(DateSelection::parse(
            self.date.as_deref(),
            self.from.as_deref(),
            self.to.as_deref(),
        )?)
    }
}

/// Report parameters. `technicians` and `installers` are comma-separated; leaving one out
/// selects the whole roster, passing it empty selects nobody.
#[derive(Debug, Deserialize)]
struct ReportQuery {
    #[serde(flatten)]
    selection: SelectionQuery,
    #[serde(default)]
    group: GroupMode,
    technicians: Option<String>,
    installers: Option<String>,
}

impl ReportQuery {
    fn filter(&self, app_state: &AppState) -> ReportFilter {
        let technicians = match &self.technicians {
            Some(names) => split_names(names),
            None => app_state.roster.technicians.clone(),
        };
        let installers = match &self.installers {
            Some(names) => split_names(names),
            None => app_state.roster.installers.clone(),
        };
        ReportFilter::new(technicians, installers)
    }
}

fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportResponse {
    #[serde(flatten)]
    report: Report,
    summary: Vec<SummaryRow>,
}

async fn load(
    app_state: &AppState,
    selection: &DateSelection,
) -> Result<Vec<InstallRecord>, ApiError> {
    load_installs(
        app_state.install_source.as_ref(),
        selection,
        &app_state.shutdown,
    )
    .await?
    .ok_or_else(|| ApiError::unavailable("Server is shutting down"))
}

async fn build_report(app_state: &AppState, query: &ReportQuery) -> Result<Report, ApiError> {
    let selection = query.selection.selection()?;
    let records = load(app_state, &selection).await?;

    Ok(Report::build(
        &records,
        selection,
        query.group,
        &query.filter(app_state),
    ))
}

#[instrument(name = "list_installs", skip(app_state))]
async fn list_installs(
    State(app_state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Vec<InstallRecord>>, ApiError> {
    let selection = query.selection()?;
    Ok(Json(load(&app_state, &selection).await?))
}

#[instrument(name = "report", skip(app_state))]
async fn report(
    State(app_state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, ApiError> {
    let report = build_report(&app_state, &query).await?;
    let summary = report.summary();

    Ok(Json(ReportResponse { report, summary }))
}

#[instrument(name = "export", skip(app_state))]
async fn export(
    State(app_state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = build_report(&app_state, &query).await?;
    let csv = to_csv_string(&report)?;
    let disposition = format!("attachment; filename=\"{}\"", export_file_name(&report));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
