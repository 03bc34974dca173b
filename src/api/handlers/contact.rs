use axum::extract::{Path, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::extractors::{JsonBody, ValidatedJson};
use crate::api::response::{ApiResponse, Created};
use crate::api::AppState;
use crate::domain::{Contact, ContactStatus, NewContact};
use crate::error::{AppResult, OptionExt};

pub async fn create_contact(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NewContact>,
) -> AppResult<Created<Contact>> {
    let contact = Contact::create(payload);
    state.store.contacts.save(&contact).await?;
    tracing::debug!(contact_id = %contact.id, "contact message received");
    Ok(Created(contact))
}

pub async fn list_contacts(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Contact>>> {
    Ok(ApiResponse::success(state.store.contacts.list().await?))
}

#[derive(Debug, Deserialize)]
pub struct ContactStatusRequest {
    pub status: String,
}

pub async fn update_contact_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<ContactStatusRequest>,
) -> AppResult<ApiResponse<Contact>> {
    let status = ContactStatus::parse(payload.status.trim())?;
    let mut contact = state.store.contacts.find(id).await?.or_not_found("Contact")?;
    contact.status = status;
    state.store.contacts.save(&contact).await?;
    Ok(ApiResponse::success(contact))
}
