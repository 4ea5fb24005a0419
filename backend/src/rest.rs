//! Axum handlers for the pocket-money API.
//!
//! The handlers are thin: they translate HTTP payloads into domain commands,
//! call the services, and map `DomainError` variants onto status codes.
//! Every mutating entry endpoint returns the recomputed ledger so the caller
//! never needs a second round trip to refresh totals.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use shared::{
    AddEntryRequest, CreateChildRequest, UpdateAllocationRequest, UpdateChildRequest,
    UpdateEntryRequest, UpdateSettingsRequest,
};
use tracing::{error, info, warn};

use crate::domain::child_service::ChildService;
use crate::domain::commands::child::{
    CreateChildCommand, DeleteChildCommand, GetChildCommand, UpdateAllocationCommand,
    UpdateChildCommand,
};
use crate::domain::commands::entry::{AddEntryCommand, DeleteEntryCommand, UpdateEntryCommand};
use crate::domain::commands::settings::UpdateSettingsCommand;
use crate::domain::entry_service::EntryService;
use crate::domain::errors::DomainError;
use crate::domain::settings_service::SettingsService;
use crate::storage::{DatasetHandle, JsonStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub child_service: ChildService<JsonStore>,
    pub entry_service: EntryService<JsonStore>,
    pub settings_service: SettingsService<JsonStore>,
}

impl AppState {
    /// Build the full service stack on top of one dataset handle.
    pub fn new(store: JsonStore) -> Self {
        let handle = Arc::new(DatasetHandle::new(store));
        Self {
            child_service: ChildService::new(Arc::clone(&handle)),
            entry_service: EntryService::new(Arc::clone(&handle)),
            settings_service: SettingsService::new(handle),
        }
    }
}

/// API router with all routes mounted under `/api`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/kids", get(list_children).post(create_child))
        .route(
            "/kids/:kid_id",
            get(get_child).put(update_child).delete(delete_child),
        )
        .route("/kids/:kid_id/allocation", put(update_allocation))
        .route("/kids/:kid_id/entries", post(add_entry))
        .route(
            "/kids/:kid_id/entries/:entry_id",
            put(update_entry).delete(delete_entry),
        )
        .route("/settings", get(get_settings).put(update_settings));

    Router::new().nest("/api", api).with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(error: DomainError, action: &str) -> Response {
    let status = match &error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Error {}: {:?}", action, error);
    } else {
        warn!("Rejected {}: {}", action, error);
    }
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Axum handler for GET /api/kids
pub async fn list_children(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/kids");
    match state.child_service.list_children() {
        Ok(result) => (StatusCode::OK, Json(result.kids)).into_response(),
        Err(e) => error_response(e, "listing children"),
    }
}

/// Axum handler for POST /api/kids
pub async fn create_child(
    State(state): State<AppState>,
    Json(request): Json<CreateChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/kids - name: {}", request.name);
    match state.child_service.create_child(CreateChildCommand {
        name: request.name,
    }) {
        Ok(result) => (StatusCode::CREATED, Json(result.kid)).into_response(),
        Err(e) => error_response(e, "creating child"),
    }
}

/// Axum handler for GET /api/kids/:kid_id
pub async fn get_child(
    State(state): State<AppState>,
    Path(kid_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/kids/{}", kid_id);
    match state.child_service.get_child(GetChildCommand { kid_id }) {
        Ok(result) => (StatusCode::OK, Json(result.kid)).into_response(),
        Err(e) => error_response(e, "fetching child"),
    }
}

/// Axum handler for PUT /api/kids/:kid_id
pub async fn update_child(
    State(state): State<AppState>,
    Path(kid_id): Path<String>,
    Json(request): Json<UpdateChildRequest>,
) -> impl IntoResponse {
    info!("PUT /api/kids/{}", kid_id);
    match state.child_service.update_child(UpdateChildCommand {
        kid_id,
        name: request.name,
    }) {
        Ok(result) => (StatusCode::OK, Json(result.kid)).into_response(),
        Err(e) => error_response(e, "updating child"),
    }
}

/// Axum handler for DELETE /api/kids/:kid_id
pub async fn delete_child(
    State(state): State<AppState>,
    Path(kid_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/kids/{}", kid_id);
    match state
        .child_service
        .delete_child(DeleteChildCommand { kid_id })
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(e, "deleting child"),
    }
}

/// Axum handler for PUT /api/kids/:kid_id/allocation
pub async fn update_allocation(
    State(state): State<AppState>,
    Path(kid_id): Path<String>,
    Json(request): Json<UpdateAllocationRequest>,
) -> impl IntoResponse {
    info!("PUT /api/kids/{}/allocation", kid_id);
    match state
        .child_service
        .update_allocation(UpdateAllocationCommand {
            kid_id,
            spent: request.spent,
            saved: request.saved,
            given: request.given,
            interest_rate: request.interest_rate,
        }) {
        Ok(result) => (StatusCode::OK, Json(result.kid)).into_response(),
        Err(e) => error_response(e, "updating allocation"),
    }
}

/// Axum handler for POST /api/kids/:kid_id/entries
pub async fn add_entry(
    State(state): State<AppState>,
    Path(kid_id): Path<String>,
    Json(request): Json<AddEntryRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/kids/{}/entries - period: {}",
        kid_id, request.period
    );
    match state.entry_service.add_entry(AddEntryCommand {
        kid_id,
        period: request.period,
        amount: request.amount,
        spent_percent: request.spent_percent,
        saved_percent: request.saved_percent,
        given_percent: request.given_percent,
        interest_rate: request.interest_rate,
        used_from_saved: request.used_from_saved,
    }) {
        Ok(result) => (StatusCode::CREATED, Json(result)).into_response(),
        Err(e) => error_response(e, "adding entry"),
    }
}

/// Axum handler for PUT /api/kids/:kid_id/entries/:entry_id
pub async fn update_entry(
    State(state): State<AppState>,
    Path((kid_id, entry_id)): Path<(String, String)>,
    Json(request): Json<UpdateEntryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/kids/{}/entries/{}", kid_id, entry_id);
    match state.entry_service.update_entry(UpdateEntryCommand {
        kid_id,
        entry_id,
        amount: request.amount,
        spent_percent: request.spent_percent,
        saved_percent: request.saved_percent,
        given_percent: request.given_percent,
        interest_rate: request.interest_rate,
        used_from_saved: request.used_from_saved,
        period: request.period,
    }) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(e, "updating entry"),
    }
}

/// Axum handler for DELETE /api/kids/:kid_id/entries/:entry_id
pub async fn delete_entry(
    State(state): State<AppState>,
    Path((kid_id, entry_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/kids/{}/entries/{}", kid_id, entry_id);
    match state
        .entry_service
        .delete_entry(DeleteEntryCommand { kid_id, entry_id })
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(e, "deleting entry"),
    }
}

/// Axum handler for GET /api/settings
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings");
    match state.settings_service.get_settings() {
        Ok(result) => (StatusCode::OK, Json(result.settings)).into_response(),
        Err(e) => error_response(e, "fetching settings"),
    }
}

/// Axum handler for PUT /api/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    info!("PUT /api/settings");
    match state
        .settings_service
        .update_settings(UpdateSettingsCommand {
            period: request.period,
            currency: request.currency,
        }) {
        Ok(result) => (StatusCode::OK, Json(result.settings)).into_response(),
        Err(e) => error_response(e, "updating settings"),
    }
}
