use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use service::errors::ServiceError;
use service::items::{parse_item_id, Item, ItemId, ItemInput};

use crate::errors::ApiError;
use crate::metrics;
use crate::routes::ServerState;

type IdQuery = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// First `id` value of the query string, validated as a positive integer.
fn item_id(query: IdQuery) -> Result<ItemId, ApiError> {
    let Query(pairs) = query.map_err(|e| ServiceError::InvalidArgument(e.body_text()))?;
    let raw = pairs.iter().find(|(k, _)| k == "id").map(|(_, v)| v.as_str());
    Ok(parse_item_id(raw)?)
}

/// GET /items
pub async fn list_items(State(state): State<ServerState>) -> Json<Vec<Item>> {
    Json(state.items.list().await)
}

/// POST /items
pub async fn create_item(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let input = ItemInput::from_json(&body)?;
    let item = state.items.create(input).await?;
    metrics::ITEMS_CREATED_TOTAL.inc();
    metrics::ITEMS.inc();
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /item?id=N
pub async fn get_item(State(state): State<ServerState>, query: IdQuery) -> Result<Json<Item>, ApiError> {
    let id = item_id(query)?;
    Ok(Json(state.items.get(id).await?))
}

/// PUT /item?id=N
///
/// The body is decoded before the lookup, so a bad payload for a missing id
/// is still a 400.
pub async fn update_item(
    State(state): State<ServerState>,
    query: IdQuery,
    body: Bytes,
) -> Result<Json<Item>, ApiError> {
    let id = item_id(query)?;
    let input = ItemInput::from_json(&body)?;
    let item = state.items.update(id, input).await?;
    metrics::ITEMS_UPDATED_TOTAL.inc();
    Ok(Json(item))
}

/// DELETE /item?id=N
pub async fn delete_item(State(state): State<ServerState>, query: IdQuery) -> Result<StatusCode, ApiError> {
    let id = item_id(query)?;
    state.items.delete(id).await?;
    metrics::ITEMS_DELETED_TOTAL.inc();
    metrics::ITEMS.dec();
    Ok(StatusCode::NO_CONTENT)
}
