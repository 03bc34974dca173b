//! Custom request extractors.

mod validated_json;

use axum::extract::FromRequest;

use crate::error::AppError;

pub use validated_json::ValidatedJson;

/// `axum::Json` with malformed bodies reported through [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
