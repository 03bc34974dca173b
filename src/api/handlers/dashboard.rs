//! Admin dashboard counters, recomputed on every call.

use axum::extract::State;
use serde::Serialize;

use super::orders::{with_users, OrderView};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::config::DASHBOARD_RECENT_ORDERS;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub products: u64,
    pub orders: u64,
    pub users: u64,
    pub revenue: f64,
    pub pending_orders: u64,
    pub completed_orders: u64,
    pub contacts: u64,
    pub low_stock: u64,
    pub avg_order_value: f64,
    pub recent_orders: Vec<OrderView>,
}

/// Revenue per order rounded to a whole unit; 0 without orders.
fn average_order_value(revenue: f64, orders: u64) -> f64 {
    if orders == 0 {
        return 0.0;
    }
    (revenue / orders as f64).round()
}

pub async fn stats(State(state): State<AppState>) -> AppResult<ApiResponse<DashboardStats>> {
    let store = &state.store;
    let (products, order_stats, users, contacts, low_stock, recent) = tokio::try_join!(
        store.products.count(),
        store.orders.stats(),
        store.users.count(),
        store.contacts.count(),
        store.products.count_low_stock(state.config.low_stock_threshold),
        store.orders.recent(DASHBOARD_RECENT_ORDERS),
    )?;

    Ok(ApiResponse::success(DashboardStats {
        products,
        orders: order_stats.count,
        users,
        revenue: order_stats.revenue,
        pending_orders: order_stats.pending,
        completed_orders: order_stats.delivered,
        contacts,
        low_stock,
        avg_order_value: average_order_value(order_stats.revenue, order_stats.count),
        recent_orders: with_users(&state, recent).await?,
    }))
}
