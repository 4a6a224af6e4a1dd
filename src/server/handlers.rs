//! HTTP handlers for the contacts API.
//!
//! Every handler returns `{msg, ...}` JSON on success and `{msg}` on failure.

use crate::domain::ValidationError;
use crate::error::{ContactError, ContactResult};
use crate::server::upload::{ContactForm, UploadedFile};
use crate::server::AppState;
use crate::services::SearchQuery;
use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection, rejection::BytesRejection, Multipart, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

fn contacts_noun(count: usize) -> &'static str {
    if count == 1 {
        "contact"
    } else {
        "contacts"
    }
}

async fn read_form(multipart: Result<Multipart, MultipartRejection>) -> ContactResult<ContactForm> {
    let multipart =
        multipart.map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;
    ContactForm::from_multipart(multipart).await
}

/// POST /api/v1/contacts
pub async fn create_contact(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ContactResult<Json<Value>> {
    let ContactForm { payload, file } = read_form(multipart).await?;
    let contact = state
        .contact_service
        .create_contact(payload, file.as_ref().map(UploadedFile::path))
        .await?;

    Ok(Json(json!({
        "msg": "Contact created!",
        "data": contact,
    })))
}

/// GET /api/v1/contacts
pub async fn list_contacts(State(state): State<AppState>) -> ContactResult<Json<Value>> {
    let contacts = state.contact_service.list_contacts().await?;
    let count = contacts.len();

    Ok(Json(json!({
        "msg": format!("Total {} {}", count, contacts_noun(count)),
        "count": count,
        "data": contacts,
    })))
}

/// PATCH /api/v1/contacts/:id
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ContactResult<Json<Value>> {
    let ContactForm { payload, file } = read_form(multipart).await?;
    let updated = state
        .contact_service
        .update_contact(&id, payload, file.as_ref().map(UploadedFile::path))
        .await?;

    Ok(Json(json!({
        "msg": "Updated successfully!",
        "updatedContact": updated,
    })))
}

/// DELETE /api/v1/contacts/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ContactResult<Json<Value>> {
    state.contact_service.delete_contact(&id).await?;
    Ok(Json(json!({ "msg": "Success! Contact Removed" })))
}

/// POST /api/v1/contacts/search
///
/// The body is optional; an empty body searches for nothing.
pub async fn search_contacts(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ContactResult<Json<Value>> {
    let body = body.map_err(|rejection| ContactError::BodyRejected {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    let query: SearchQuery = if body.iter().all(u8::is_ascii_whitespace) {
        SearchQuery::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ValidationError::MalformedBody(e.to_string()))?
    };

    let contacts = state.search_service.search(&query).await?;
    let count = contacts.len();

    Ok(Json(json!({
        "msg": format!("Found {} {}", count, contacts_noun(count)),
        "count": count,
        "searchedContacts": contacts,
    })))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "metrics": state.metrics.summary(),
    }))
}

/// Fallback for unknown routes and unsupported methods.
pub async fn route_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "msg": "Route does not exist" })),
    )
}

/// Give timed-out requests a `{msg}` body; the timeout layer answers 408 with
/// an empty one.
pub async fn request_timed_out(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    tracing::warn!("Request timed out");
    (
        StatusCode::REQUEST_TIMEOUT,
        Json(json!({ "msg": "Request timed out" })),
    )
        .into_response()
}
