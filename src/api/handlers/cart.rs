//! Shopping cart. Mounted under both `/api/cart` and `/api/users/cart`.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::load_user;
use crate::api::extractors::JsonBody;
use crate::api::middleware::CurrentUser;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::{Cart, ProductSummary, SelectedOptions};
use crate::error::{AppResult, OptionExt};

/// Cart line with the product it points at, when that still exists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: Uuid,
    pub quantity: u32,
    pub selected_options: Option<SelectedOptions>,
    pub product: Option<ProductSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: Option<i64>,
    pub selected_options: Option<SelectedOptions>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Negative and oversized request quantities map onto values the cart rejects.
fn to_quantity(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

async fn cart_view(state: &AppState, cart: &Cart) -> AppResult<Vec<CartLineView>> {
    let ids: Vec<Uuid> = cart.items().iter().map(|i| i.product_id).collect();
    let products: HashMap<Uuid, ProductSummary> = state
        .store
        .products
        .find_many(&ids)
        .await?
        .iter()
        .map(|p| (p.id, ProductSummary::from(p)))
        .collect();

    Ok(cart
        .items()
        .iter()
        .map(|item| CartLineView {
            product_id: item.product_id,
            quantity: item.quantity,
            selected_options: item.selected_options.clone(),
            product: products.get(&item.product_id).cloned(),
        })
        .collect())
}

pub async fn get_cart(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<ApiResponse<Vec<CartLineView>>> {
    let user = load_user(&state, current.id).await?;
    Ok(ApiResponse::success(cart_view(&state, &user.cart).await?))
}

/// Quantities of an existing line are summed and checked against stock.
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    JsonBody(payload): JsonBody<AddToCartRequest>,
) -> AppResult<ApiResponse<Vec<CartLineView>>> {
    let quantity = to_quantity(payload.quantity.unwrap_or(1));
    let product = state.store.products.find(payload.product_id).await?.or_not_found("Product")?;
    let mut user = load_user(&state, current.id).await?;

    user.cart.add(&product, quantity, payload.selected_options)?;
    user.touch();
    state.store.users.save(&user).await?;
    Ok(ApiResponse::success(cart_view(&state, &user.cart).await?))
}

pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateQuantityRequest>,
) -> AppResult<ApiResponse<Vec<CartLineView>>> {
    let product = state.store.products.find(product_id).await?.or_not_found("Product")?;
    let mut user = load_user(&state, current.id).await?;

    user.cart.set_quantity(&product, to_quantity(payload.quantity))?;
    user.touch();
    state.store.users.save(&user).await?;
    Ok(ApiResponse::success(cart_view(&state, &user.cart).await?))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(product_id): Path<Uuid>,
) -> AppResult<ApiResponse<Vec<CartLineView>>> {
    let mut user = load_user(&state, current.id).await?;
    if user.cart.remove(product_id) {
        user.touch();
        state.store.users.save(&user).await?;
    }
    Ok(ApiResponse::success(cart_view(&state, &user.cart).await?))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<ApiResponse<Vec<CartLineView>>> {
    let mut user = load_user(&state, current.id).await?;
    user.cart.clear();
    user.touch();
    state.store.users.save(&user).await?;
    Ok(ApiResponse::success(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_quantity() {
        assert_eq!(to_quantity(3), 3);
        assert_eq!(to_quantity(0), 0);
        assert_eq!(to_quantity(-4), 0);
        assert_eq!(to_quantity(i64::MAX), u32::MAX);
    }
}
