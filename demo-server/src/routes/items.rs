use axum::{
    extract::{Path, Query},
    routing::get,
    Extension, Json, Router,
};
use request_logger::RequestContext;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub id: u32,
    pub name: &'static str,
}

const ITEMS: &[Item] = &[
    Item { id: 1, name: "keyboard" },
    Item { id: 2, name: "monitor" },
    Item { id: 3, name: "headset" },
];

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

async fn list_items(
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Item>>> {
    let limit = query.limit.unwrap_or(ITEMS.len());
    if limit == 0 {
        return Err(Error::InvalidRequest("limit must be positive".to_string()));
    }

    let items: Vec<Item> = ITEMS.iter().take(limit).cloned().collect();
    ctx.set("item_count", items.len());
    Ok(Json(items))
}

async fn get_item(
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<u32>,
) -> Result<Json<Item>> {
    ctx.set("item_id", id);
    ITEMS
        .iter()
        .find(|item| item.id == id)
        .cloned()
        .map(Json)
        .ok_or(Error::NotFound(id))
}

/// Always fails, to show how private errors reach the request log.
async fn fail() -> Result<Json<Item>> {
    Err(Error::Internal("inventory backend unreachable".to_string()))
}

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items))
        .route("/items/:id", get(get_item))
        .route("/fail", get(fail))
}
