//! Network REST handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use hive_entity::Network;
use hive_service::{NetworkDetail, NetworkQuery};

use crate::dto::NetworkRequest;
use crate::error::ApiError;
use crate::extractors::AuthPrincipal;
use crate::state::AppState;

/// GET /network
pub async fn list_networks(
    State(state): State<AppState>,
    auth: AuthPrincipal,
    Query(query): Query<NetworkQuery>,
) -> Result<Json<Vec<Network>>, ApiError> {
    let networks = state.networks.list(&auth, query).await?;
    Ok(Json(networks))
}

/// GET /network/{id}
pub async fn get_network(
    State(state): State<AppState>,
    auth: AuthPrincipal,
    Path(id): Path<i64>,
) -> Result<Json<NetworkDetail>, ApiError> {
    let network = state.networks.get(&auth, id).await?;
    Ok(Json(network))
}

/// POST /network
pub async fn create_network(
    State(state): State<AppState>,
    auth: AuthPrincipal,
    Json(req): Json<NetworkRequest>,
) -> Result<(StatusCode, Json<Network>), ApiError> {
    req.validate()?;
    let network = state.networks.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(network)))
}

/// PUT /network/{id}
pub async fn update_network(
    State(state): State<AppState>,
    auth: AuthPrincipal,
    Path(id): Path<i64>,
    Json(req): Json<NetworkRequest>,
) -> Result<Json<Network>, ApiError> {
    req.validate()?;
    let network = state.networks.update(&auth, id, req.into()).await?;
    Ok(Json(network))
}

/// DELETE /network/{id}
pub async fn delete_network(
    State(state): State<AppState>,
    auth: AuthPrincipal,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.networks.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
