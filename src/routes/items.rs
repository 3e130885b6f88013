use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    routing::{get, patch, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::{entities::item, item_repo::ItemQuery},
    error::ServiceError,
    services::{
        item_service::{self, CreateItem},
        patch::{FieldPatch, ItemPatch},
    },
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub list_id: Option<i32>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    // Accepted on the wire for compatibility; items always start open.
    pub done: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub category: FieldPatch<String>,
    pub quantity: FieldPatch<f64>,
    pub unit: FieldPatch<String>,
    pub done: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListItemsParams {
    pub q: Option<String>,
    pub open: Option<bool>,
}

/// One-way projection of an item row; nothing maps back from here to the
/// entity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i32,
    pub list_id: i32,
    pub name: String,
    pub category: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub done: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/items", post(create_item))
        .route("/lists/{list_id}/items", get(list_items))
        .route(
            "/lists/{list_id}/items/{item_id}",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route(
            "/lists/{list_id}/items/{item_id}/toggle",
            patch(toggle_done),
        )
        .with_state(state)
}

async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateItemRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<ItemResponse>), ServiceError> {
    let input = CreateItem {
        list_id: body.list_id,
        name: body.name,
        category: body.category,
        quantity: body.quantity,
        unit: body.unit,
    };
    let item = item_service::create_item(&state.db, input).await?;
    let location = format!("/lists/{}/items/{}", item.list_id, item.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(item.into()),
    ))
}

async fn list_items(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<i32>,
    Query(params): Query<ListItemsParams>,
) -> Result<Json<Vec<ItemResponse>>, ServiceError> {
    let query = ItemQuery {
        open_only: params.open.unwrap_or(false),
        name_like: params.q,
    };
    let items = item_service::list_items(&state.db, list_id, query).await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

async fn get_item(
    State(state): State<Arc<AppState>>,
    Path((list_id, item_id)): Path<(i32, i32)>,
) -> Result<Json<ItemResponse>, ServiceError> {
    let item = item_service::get_item(&state.db, list_id, item_id).await?;
    Ok(Json(item.into()))
}

async fn update_item(
    State(state): State<Arc<AppState>>,
    Path((list_id, item_id)): Path<(i32, i32)>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ServiceError> {
    let item = item_service::update_item(&state.db, list_id, item_id, body.into()).await?;
    Ok(Json(item.into()))
}

async fn toggle_done(
    State(state): State<Arc<AppState>>,
    Path((list_id, item_id)): Path<(i32, i32)>,
) -> Result<Json<ItemResponse>, ServiceError> {
    let item = item_service::toggle_done(&state.db, list_id, item_id).await?;
    Ok(Json(item.into()))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path((list_id, item_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ServiceError> {
    item_service::delete_item(&state.db, list_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

impl From<UpdateItemRequest> for ItemPatch {
    fn from(body: UpdateItemRequest) -> Self {
        Self {
            name: body.name,
            category: body.category,
            quantity: body.quantity,
            unit: body.unit,
            done: body.done,
        }
    }
}

impl From<item::Model> for ItemResponse {
    fn from(model: item::Model) -> Self {
        Self {
            id: model.id,
            list_id: model.list_id,
            name: model.name,
            category: model.category,
            quantity: model.quantity,
            unit: model.unit,
            done: model.done,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
