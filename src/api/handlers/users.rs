//! Profile, addresses and user administration.

use axum::{
    extract::{Path, State},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{load_user, product_summaries};
use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::domain::{parse_email, Address, AddressInput, Cart, Order, Password, ProductSummary, Role, User};
use crate::error::{AppError, AppResult};

/// The caller's account with orders and a resolved wishlist.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub cart: Cart,
    pub addresses: Vec<Address>,
    pub wishlist: Vec<ProductSummary>,
    pub orders: Vec<Order>,
    pub created_at: DateTime<Utc>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<ApiResponse<ProfileView>> {
    let user = load_user(&state, current.id).await?;
    let (orders, wishlist) = tokio::try_join!(
        state.store.orders.all_for_user(user.id),
        product_summaries(&state, &user.wishlist),
    )?;

    Ok(ApiResponse::success(ProfileView {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        cart: user.cart,
        addresses: user.addresses,
        wishlist,
        orders,
        created_at: user.created_at,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    JsonBody(payload): JsonBody<UpdateProfileRequest>,
) -> AppResult<ApiResponse<User>> {
    let mut user = load_user(&state, current.id).await?;

    if let Some(name) = payload.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        user.name = name.to_string();
    }

    if let Some(email) = payload.email.as_deref().filter(|e| !e.trim().is_empty()) {
        let email = parse_email(email)?;
        if email != user.email {
            if state.store.users.find_by_email(&email).await?.is_some() {
                return Err(AppError::conflict("Email"));
            }
            user.email = email;
        }
    }

    if let Some(new_password) = payload.new_password.as_deref().filter(|p| !p.is_empty()) {
        let confirmed = payload
            .current_password
            .as_deref()
            .is_some_and(|current| user.password.verify(current));
        if !confirmed {
            return Err(AppError::validation("Current password is incorrect"));
        }
        user.password = Password::new(new_password)?;
    }

    user.touch();
    state.store.users.save(&user).await?;
    Ok(ApiResponse::success(user))
}

pub async fn add_address(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<AddressInput>,
) -> AppResult<ApiResponse<Vec<Address>>> {
    let mut user = load_user(&state, current.id).await?;
    user.add_address(payload);
    state.store.users.save(&user).await?;
    Ok(ApiResponse::success(user.addresses))
}

pub async fn delete_address(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(address_id): Path<Uuid>,
) -> AppResult<ApiResponse<Vec<Address>>> {
    let mut user = load_user(&state, current.id).await?;
    user.remove_address(address_id);
    state.store.users.save(&user).await?;
    Ok(ApiResponse::success(user.addresses))
}

// Administration

pub async fn list_users(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<User>>> {
    Ok(ApiResponse::success(state.store.users.list().await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    if !state.store.users.delete(id).await? {
        return Err(AppError::not_found("User"));
    }
    tracing::info!(user_id = %id, "user deleted");
    Ok(ApiResponse::message("User deleted"))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<ResetPasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    let mut user = load_user(&state, id).await?;
    user.password = Password::new(&payload.password)?;
    user.touch();
    state.store.users.save(&user).await?;
    tracing::info!(user_id = %id, "password reset by admin");
    Ok(ApiResponse::message("Password updated successfully"))
}
