pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::keys::ApiKeys;
use crate::config::Config;
use crate::state::{AppState, SharedState};
use crate::store::ConfigStore;

pub fn build_app(config: Config) -> Router {
    let Config {
        api_key,
        admin_key,
        max_body_size,
        initial_configs,
        ..
    } = config;

    if !initial_configs.is_empty() {
        tracing::info!(
            count = initial_configs.len(),
            "Loaded initial email configurations"
        );
    }

    let state: SharedState = Arc::new(AppState {
        keys: ApiKeys::new(api_key, admin_key),
        store: ConfigStore::seeded(initial_configs),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("no-referrer"),
        ));

    // Enforced inside the JSON extractor so oversized bodies still get the
    // error envelope.
    Router::new()
        .merge(routes::api_routes())
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(layers)
        .with_state(state)
}
