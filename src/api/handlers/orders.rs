//! Checkout and order management.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::load_user;
use crate::api::extractors::JsonBody;
use crate::api::middleware::CurrentUser;
use crate::api::response::{ApiResponse, Created, OrderPage};
use crate::api::AppState;
use crate::catalog::{pagination::total_pages, PageRequest};
use crate::config::DEFAULT_ORDER_PAGE_SIZE;
use crate::domain::{NewOrder, Order, OrderStatus, UserRef};
use crate::error::{AppError, AppResult, OptionExt};

/// An order with the account that placed it, when that account still exists.
#[derive(Debug, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub user: Option<UserRef>,
}

pub(crate) async fn with_users(state: &AppState, orders: Vec<Order>) -> AppResult<Vec<OrderView>> {
    let mut ids: Vec<Uuid> = orders.iter().map(|o| o.user_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let users: HashMap<Uuid, UserRef> = state
        .store
        .users
        .find_many(&ids)
        .await?
        .iter()
        .map(|u| (u.id, UserRef::from(u)))
        .collect();

    Ok(orders
        .into_iter()
        .map(|order| OrderView { user: users.get(&order.user_id).cloned(), order })
        .collect())
}

/// Place an order and empty the caller's cart.
pub async fn create_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    JsonBody(payload): JsonBody<NewOrder>,
) -> AppResult<Created<Order>> {
    let order = Order::place(current.id, payload)?;
    state.store.orders.save(&order).await?;
    tracing::info!(order_id = %order.id, user_id = %current.id, total = order.total_price, "order created");

    let mut user = load_user(&state, current.id).await?;
    if !user.cart.is_empty() {
        user.cart.clear();
        user.touch();
        state.store.users.save(&user).await?;
    }
    Ok(Created(order))
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Admins see every order; everyone else only their own.
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<OrderListParams>,
) -> AppResult<OrderPage<OrderView>> {
    let request = PageRequest::parse(params.page.as_deref(), params.limit.as_deref(), DEFAULT_ORDER_PAGE_SIZE);
    let owner = (!current.is_admin()).then_some(current.id);
    let page = state.store.orders.list(owner, request).await?;

    Ok(OrderPage {
        success: true,
        total_pages: total_pages(page.total, request.limit),
        current_page: request.page,
        data: with_users(&state, page.items).await?,
    })
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<OrderView>> {
    let order = state.store.orders.find(id).await?.or_not_found("Order")?;
    if !order.is_owned_by(current.id) && !current.is_admin() {
        return Err(AppError::forbidden("Not authorized to view this order"));
    }
    let view = with_users(&state, vec![order]).await?.into_iter().next().or_not_found("Order")?;
    Ok(ApiResponse::success(view))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<StatusRequest>,
) -> AppResult<ApiResponse<Order>> {
    let status = OrderStatus::parse(payload.status.trim())?;
    let mut order = state.store.orders.find(id).await?.or_not_found("Order")?;
    order.set_status(status);
    state.store.orders.save(&order).await?;
    tracing::info!(order_id = %id, status = status.as_str(), "order status changed");
    Ok(ApiResponse::success(order))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    if !state.store.orders.delete(id).await? {
        return Err(AppError::not_found("Order"));
    }
    tracing::info!(order_id = %id, "order deleted");
    Ok(ApiResponse::message("Order deleted"))
}
