use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, routes};

pub fn create(app_state: AppState, app_url: &str) -> Router<()> {
    let app = Router::new()
        .nest("/.netlify/functions", routes::functions::router())
        .nest("/installs", routes::installs::router());

    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION])
        .allow_origin(match HeaderValue::from_str(app_url) {
            Ok(origin) => AllowOrigin::exact(origin),
            Err(_) => {
                tracing::warn!(%app_url, "app_url is not a valid origin, CORS disabled");
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        });

    app.with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use installs::{DemoGenerator, DemoSource, Roster};
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use super::*;
    use crate::config::ServiceTitanSettings;

    fn app() -> Router {
        let roster = Roster::demo();
        let source = DemoSource::new(DemoGenerator::new(roster.clone()), Default::default());
        let state = AppState::new(
            ServiceTitanSettings::default(),
            roster,
            Arc::new(source),
            CancellationToken::new(),
        );
        create(state, "http://localhost:5173")
    }

    #[tokio::test]
    async fn only_function_and_install_routes_are_served() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_allows_the_configured_origin() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/installs?date=2024-01-10")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
    }
}
