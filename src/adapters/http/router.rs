//! Top-level router: API, form actions, health, and the shared layers.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::actions::action_routes;
use super::api::{api_routes, handlers::health};
use super::middleware::auth_middleware;
use super::state::AppState;

/// Layer settings taken from the server configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Origins allowed to call the API cross-site. Empty means same-origin only.
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

pub fn build_router(state: AppState, config: RouterConfig) -> Router {
    let auth = axum::middleware::from_fn_with_state(state.auth_state(), auth_middleware);

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .merge(action_routes())
        .layer(auth)
        .with_state(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http());

    match cors_layer(&config.cors_origins) {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
    )
}
