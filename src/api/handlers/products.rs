//! Catalog endpoints: listing, quick search, filter options, CRUD and reviews.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::response::{ApiResponse, Created, ProductPage};
use crate::api::AppState;
use crate::catalog::{FilterOptions, PageMeta, ProductFilter, ProductListParams};
use crate::config::{DEFAULT_SEARCH_LIMIT, MAX_PAGE_SIZE, MIN_SEARCH_LENGTH};
use crate::domain::{NewProduct, Product, ProductPatch, ProductSummary, Rating, Review};
use crate::error::{AppError, AppResult, OptionExt};

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<ProductPage<Product>> {
    let query = params.into_query();
    tracing::debug!(?query, "listing products");
    let page = state.store.products.list(&query).await?;
    Ok(ProductPage {
        success: true,
        total_products: page.total,
        meta: PageMeta::new(query.page, page.total),
        data: page.items.into_iter().map(Product::without_pending_reviews).collect(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

/// Suggestions for the search box.
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<ApiResponse<Vec<ProductSummary>>> {
    let term = params.q.as_deref().map(str::trim).unwrap_or_default();
    if term.chars().count() < MIN_SEARCH_LENGTH {
        return Ok(ApiResponse::success(Vec::new()));
    }
    let limit = params
        .limit
        .as_deref()
        .and_then(|l| l.trim().parse::<u64>().ok())
        .filter(|l| *l >= 1)
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_PAGE_SIZE);

    let products = state.store.products.search(&ProductFilter::search_only(term), limit).await?;
    Ok(ApiResponse::success(products.iter().map(ProductSummary::from).collect()))
}

pub async fn filter_options(State(state): State<AppState>) -> AppResult<ApiResponse<FilterOptions>> {
    let values = state.store.products.filter_values().await?;
    Ok(ApiResponse::success(FilterOptions::from(values)))
}

/// `:id` is either a product id or its slug.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> AppResult<ApiResponse<Product>> {
    let product = match Uuid::parse_str(&id_or_slug) {
        Ok(id) => state.store.products.find(id).await?,
        Err(_) => state.store.products.find_by_slug(&id_or_slug.trim().to_lowercase()).await?,
    };
    Ok(ApiResponse::success(product.or_not_found("Product")?.without_pending_reviews()))
}

pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewProduct>,
) -> AppResult<Created<Product>> {
    let product = Product::create(payload)?;
    state.store.products.save(&product).await?;
    tracing::info!(product_id = %product.id, sku = %product.sku, "product created");
    Ok(Created(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> AppResult<ApiResponse<Product>> {
    let mut product = state.store.products.find(id).await?.or_not_found("Product")?;
    patch.apply(&mut product)?;
    state.store.products.save(&product).await?;
    tracing::info!(product_id = %product.id, "product updated");
    Ok(ApiResponse::success(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    if !state.store.products.delete(id).await? {
        return Err(AppError::not_found("Product"));
    }
    tracing::info!(product_id = %id, "product deleted");
    Ok(ApiResponse::message("Product deleted"))
}

// Reviews

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

/// A review with the reviewer's display name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub rating: f64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

const ANONYMOUS: &str = "Anonymous";

async fn review_views(state: &AppState, reviews: Vec<&Review>) -> AppResult<Vec<ReviewView>> {
    let reviewer_ids: Vec<Uuid> = reviews.iter().map(|r| r.user_id).collect();
    let names: HashMap<Uuid, String> = state
        .store
        .users
        .find_many(&reviewer_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    Ok(reviews
        .into_iter()
        .map(|r| ReviewView {
            id: r.id,
            user_id: r.user_id,
            user_name: names.get(&r.user_id).cloned().unwrap_or_else(|| ANONYMOUS.to_string()),
            rating: r.rating,
            comment: r.comment.clone(),
            created_at: r.created_at,
        })
        .collect())
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Vec<ReviewView>>> {
    let product = state.store.products.find(id).await?.or_not_found("Product")?;
    Ok(ApiResponse::success(review_views(&state, product.approved_reviews().collect()).await?))
}

/// Moderation queue for one product.
pub async fn pending_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Vec<ReviewView>>> {
    let product = state.store.products.find(id).await?.or_not_found("Product")?;
    Ok(ApiResponse::success(review_views(&state, product.pending_reviews().collect()).await?))
}

pub async fn submit_review(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<ReviewRequest>,
) -> AppResult<ApiResponse<()>> {
    let rating = Rating::required(payload.rating)?;
    let mut product = state.store.products.find(id).await?.or_not_found("Product")?;
    let outcome = product.submit_review(current.id, rating, payload.comment.as_deref());
    state.store.products.save(&product).await?;
    tracing::debug!(product_id = %id, user_id = %current.id, ?outcome, "review submitted");
    Ok(ApiResponse::message(outcome.message()))
}

pub async fn approve_review(
    State(state): State<AppState>,
    Path((id, review_id)): Path<(Uuid, Uuid)>,
) -> AppResult<ApiResponse<Product>> {
    let mut product = state.store.products.find(id).await?.or_not_found("Product")?;
    product.approve_review(review_id)?;
    state.store.products.save(&product).await?;
    tracing::info!(product_id = %id, review_id = %review_id, "review approved");
    Ok(ApiResponse::with_message(product, "Review approved"))
}
