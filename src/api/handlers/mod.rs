//! Route handlers, one module per resource.

pub mod auth;
pub mod cart;
pub mod contact;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod testimonials;
pub mod users;
pub mod wishlist;

use std::collections::HashMap;

use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{ProductSummary, User};
use crate::error::{AppResult, OptionExt};

/// Fresh copy of the caller's account.
pub(crate) async fn load_user(state: &AppState, id: Uuid) -> AppResult<User> {
    state.store.users.find(id).await?.or_not_found("User")
}

/// Resolve product ids to summaries, keeping the order of `ids` and
/// skipping products that no longer exist.
pub(crate) async fn product_summaries(state: &AppState, ids: &[Uuid]) -> AppResult<Vec<ProductSummary>> {
    let found: HashMap<Uuid, ProductSummary> = state
        .store
        .products
        .find_many(ids)
        .await?
        .iter()
        .map(|p| (p.id, ProductSummary::from(p)))
        .collect();
    Ok(ids.iter().filter_map(|id| found.get(id).cloned()).collect())
}
