//! Route definitions for the hive HTTP API.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use hive_core::config::ServerConfig;

use crate::handlers;
use crate::state::AppState;

/// Build the router with every route, threading `state` through.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server);

    Router::new()
        .merge(network_routes())
        .route("/websocket/device", get(handlers::ws::ws_upgrade))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Network CRUD
fn network_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/network",
            get(handlers::network::list_networks).post(handlers::network::create_network),
        )
        .route(
            "/network/{id}",
            get(handlers::network::get_network)
                .put(handlers::network::update_network)
                .delete(handlers::network::delete_network),
        )
}

/// CORS from `server.cors_allowed_origins`; empty or `*` allows any origin.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_allowed_origins.is_empty()
        || config.cors_allowed_origins.iter().any(|o| o == "*")
    {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    layer.allow_origin(origins)
}
