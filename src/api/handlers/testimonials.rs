//! Customer testimonials ("customer say").

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::response::{ApiResponse, CountedList};
use crate::api::AppState;
use crate::domain::{Testimonial, TestimonialSubmission};
use crate::error::{AppError, AppResult, OptionExt};

/// One testimonial per email: a repeat submission replaces the earlier one
/// and sends it back to moderation.
pub async fn submit_testimonial(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TestimonialSubmission>,
) -> AppResult<Response> {
    let input = payload.normalize()?;

    if let Some(mut existing) = state.store.testimonials.find_by_email(&input.email).await? {
        existing.resubmit(input);
        state.store.testimonials.save(&existing).await?;
        return Ok(ApiResponse::with_message(existing, "Your feedback has been updated and is pending approval")
            .into_response());
    }

    let testimonial = Testimonial::create(input);
    state.store.testimonials.save(&testimonial).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(testimonial, "Thank you for your feedback! It will be reviewed shortly"),
    )
        .into_response())
}

pub async fn approved_testimonials(State(state): State<AppState>) -> AppResult<CountedList<Testimonial>> {
    Ok(CountedList::new(state.store.testimonials.list(true).await?))
}

pub async fn all_testimonials(State(state): State<AppState>) -> AppResult<CountedList<Testimonial>> {
    Ok(CountedList::new(state.store.testimonials.list(false).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub is_approved: bool,
}

pub async fn set_approval(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<ApprovalRequest>,
) -> AppResult<ApiResponse<Testimonial>> {
    let mut testimonial = state.store.testimonials.find(id).await?.or_not_found("Testimonial")?;
    testimonial.set_approved(payload.is_approved);
    state.store.testimonials.save(&testimonial).await?;
    let message = if payload.is_approved { "Testimonial approved" } else { "Testimonial hidden" };
    Ok(ApiResponse::with_message(testimonial, message))
}

pub async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    if !state.store.testimonials.delete(id).await? {
        return Err(AppError::not_found("Testimonial"));
    }
    Ok(ApiResponse::message("Testimonial deleted"))
}
