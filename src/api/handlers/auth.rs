//! Registration, login and the current account.

use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::load_user;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::response::{ApiResponse, Created};
use crate::api::AppState;
use crate::domain::{normalize_email, parse_email, Password, User};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<AuthPayload>> {
    let email = parse_email(&payload.email)?;
    if state.store.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("Email"));
    }

    let password = Password::new(&payload.password)?;
    let user = User::register(&payload.name, &email, password)?;
    state.store.users.save(&user).await?;
    tracing::info!(user_id = %user.id, "user registered");

    let token = state.tokens.issue(&user)?;
    Ok(Created(AuthPayload { token, user }))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthPayload>> {
    let user = state.store.users.find_by_email(&normalize_email(&payload.email)).await?;

    // Verify against a throwaway hash when the email is unknown so both
    // failure paths cost the same.
    let stored = match &user {
        Some(u) => u.password.clone(),
        None => Password::from_hash(UNKNOWN_USER_HASH.to_string()),
    };
    let valid = stored.verify(&payload.password);

    match user {
        Some(user) if valid => {
            let token = state.tokens.issue(&user)?;
            Ok(ApiResponse::success(AuthPayload { token, user }))
        }
        _ => Err(AppError::InvalidCredentials),
    }
}

pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<ApiResponse<User>> {
    Ok(ApiResponse::success(load_user(&state, current.id).await?))
}

const UNKNOWN_USER_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$5uYdzVjO1M3Y9m4cC0m2kqZr1uE0b7bqfJv1r0yJ7Vk";
