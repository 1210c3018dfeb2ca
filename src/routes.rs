use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    database::{
        UpdateOutcome, list_items, update_item_purchase_status, update_item_skip_status,
    },
    error::AppError,
    state::State,
    utils::{parse_purchase_update, parse_skip_update},
};

pub async fn update_item_handler(
    extract::State(state): extract::State<Arc<State>>,
    bytes: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let update = parse_purchase_update(&bytes)?;

    match update_item_purchase_status(&state.pool, update.item_id, update.value).await? {
        UpdateOutcome::Updated => Ok((
            StatusCode::OK,
            Json(json!({ "message": "Item updated successfully" })),
        )),
        UpdateOutcome::NotFound => Err(AppError::NotFound(update.item_id)),
    }
}

pub async fn skip_item_handler(
    extract::State(state): extract::State<Arc<State>>,
    bytes: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let update = parse_skip_update(&bytes)?;

    match update_item_skip_status(&state.pool, update.item_id, update.value).await? {
        UpdateOutcome::Updated => Ok((
            StatusCode::OK,
            Json(json!({ "message": "Item updated successfully" })),
        )),
        UpdateOutcome::NotFound => Err(AppError::NotFound(update.item_id)),
    }
}

pub async fn list_items_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Result<impl IntoResponse, AppError> {
    let items = list_items(&state.pool).await?;

    Ok((StatusCode::OK, Json(items)))
}
