//! Wishlist endpoints, also reachable under `/api/users/wishlist`.

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{load_user, product_summaries};
use crate::api::extractors::JsonBody;
use crate::api::middleware::CurrentUser;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::ProductSummary;
use crate::error::{AppError, AppResult};

type WishlistResponse = AppResult<ApiResponse<Vec<ProductSummary>>>;

pub async fn get_wishlist(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> WishlistResponse {
    let user = load_user(&state, current.id).await?;
    Ok(ApiResponse::success(product_summaries(&state, &user.wishlist).await?))
}

async fn add(state: &AppState, current: &CurrentUser, product_id: Uuid) -> WishlistResponse {
    let mut user = load_user(state, current.id).await?;
    if user.wishlist.contains(&product_id) {
        return Err(AppError::validation("Product already in wishlist"));
    }
    if state.store.products.find(product_id).await?.is_none() {
        return Err(AppError::not_found("Product"));
    }
    user.add_to_wishlist(product_id)?;
    state.store.users.save(&user).await?;
    Ok(ApiResponse::with_message(
        product_summaries(state, &user.wishlist).await?,
        "Added to wishlist",
    ))
}

pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
) -> WishlistResponse {
    add(&state, &current, product_id).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemRequest {
    pub product_id: Uuid,
}

/// Body-addressed variant used by `/api/users/wishlist`.
pub async fn add_to_wishlist_body(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    JsonBody(payload): JsonBody<WishlistItemRequest>,
) -> WishlistResponse {
    add(&state, &current, payload.product_id).await
}

pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
) -> WishlistResponse {
    let mut user = load_user(&state, current.id).await?;
    user.remove_from_wishlist(product_id);
    state.store.users.save(&user).await?;
    Ok(ApiResponse::with_message(
        product_summaries(&state, &user.wishlist).await?,
        "Removed from wishlist",
    ))
}

pub async fn clear_wishlist(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> WishlistResponse {
    let mut user = load_user(&state, current.id).await?;
    user.clear_wishlist();
    state.store.users.save(&user).await?;
    Ok(ApiResponse::with_message(Vec::new(), "Wishlist cleared"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncRequest {
    pub product_ids: Vec<Value>,
}

/// Ids that are not UUID strings are dropped.
fn well_formed_ids(raw: &[Value]) -> Vec<Uuid> {
    raw.iter()
        .filter_map(Value::as_str)
        .filter_map(|s| Uuid::parse_str(s.trim()).ok())
        .collect()
}

/// Merge a client-side wishlist (e.g. from a guest session) into the account.
pub async fn sync_wishlist(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    JsonBody(payload): JsonBody<SyncRequest>,
) -> WishlistResponse {
    let mut user = load_user(&state, current.id).await?;
    let added = user.merge_wishlist(well_formed_ids(&payload.product_ids));
    state.store.users.save(&user).await?;
    tracing::debug!(user_id = %user.id, added, "wishlist synced");
    Ok(ApiResponse::with_message(
        product_summaries(&state, &user.wishlist).await?,
        "Wishlist synced",
    ))
}
