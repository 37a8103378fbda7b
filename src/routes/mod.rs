pub mod configs;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(health::health))
        .route("/health", get(health::health))
        .route(
            "/config/{organization_code}",
            get(configs::get)
                .post(configs::create)
                .put(configs::update)
                .delete(configs::delete),
        )
        .route("/configs", get(configs::list))
}
