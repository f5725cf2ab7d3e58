use axum::{Json, extract::State};
use tracing::{info, instrument};

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::names::*;
use crate::state::AppState;

/// Reject the request unless `password` matches the shared secret.
fn require_password(state: &AppState, password: Option<&str>) -> Result<(), AppError> {
    let password = password.unwrap_or_default();
    if password.is_empty() {
        return Err(AppError::Validation(MSG_MISSING_PASSWORD.into()));
    }
    if !state.password_matches(password) {
        tracing::warn!("Rejected mutation with wrong password");
        return Err(AppError::PasswordMismatch);
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/check",
    tag = "Names",
    operation_id = "checkName",
    summary = "Check whether a name is available",
    description = "Case-insensitive lookup. A storage outage yields 503, never `available: true`.",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Availability result, or `success: false` on validation failure", body = CheckResponse),
        (status = 503, description = "Storage unavailable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn check_name(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CheckRequest>,
) -> Result<Json<CheckResponse>, AppError> {
    let name = validate_name(&payload.name)?;

    let taken = state.registry.exists(name).await?;

    Ok(Json(CheckResponse {
        success: true,
        available: !taken,
        message: (if taken { MSG_TAKEN } else { MSG_AVAILABLE }).into(),
    }))
}

#[utoipa::path(
    post,
    path = "/add",
    tag = "Names",
    operation_id = "addName",
    summary = "Reserve a name",
    description = "Reserves the name unless it is already taken (in any letter case). Requires the shared password unless `auth.protect_add` is disabled.",
    request_body = AddRequest,
    responses(
        (status = 200, description = "Reservation result; `success: false` for duplicates, validation or password errors", body = AddResponse),
        (status = 503, description = "Storage unavailable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn add_name(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AddRequest>,
) -> Result<Json<AddResponse>, AppError> {
    let name = validate_name(&payload.name)?;
    if state.config.auth.protect_add {
        require_password(&state, payload.password.as_deref())?;
    }

    let added = state.registry.add(name).await?;
    if added {
        info!("Name reserved");
    }

    Ok(Json(AddResponse {
        success: added,
        message: (if added { MSG_ADDED } else { MSG_EXISTS }).into(),
    }))
}

#[utoipa::path(
    post,
    path = "/batch-add",
    tag = "Names",
    operation_id = "batchAddNames",
    summary = "Reserve several names",
    description = "Processes names in order. Blank entries are ignored; names already taken, including repeats within the request, are reported in `skipped`. Not atomic: on a storage failure, names added before it stay reserved.",
    request_body = BatchAddRequest,
    responses(
        (status = 200, description = "Batch result, or `success: false` on validation or password errors", body = BatchAddResponse),
        (status = 503, description = "Storage unavailable part-way (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(count = payload.names.len()))]
pub async fn batch_add_names(
    State(state): State<AppState>,
    AppJson(payload): AppJson<BatchAddRequest>,
) -> Result<Json<BatchAddResponse>, AppError> {
    validate_names(&payload.names)?;
    require_password(&state, payload.password.as_deref())?;

    let outcome = state.registry.batch_add(&payload.names).await?;
    info!(
        added = outcome.added.len(),
        skipped = outcome.skipped.len(),
        "Batch processed"
    );

    Ok(Json(BatchAddResponse {
        success: true,
        message: batch_message(outcome.added.len(), outcome.skipped.len()),
        added: outcome.added,
        skipped: outcome.skipped,
    }))
}

#[utoipa::path(
    get,
    path = "/list",
    tag = "Names",
    operation_id = "listNames",
    summary = "List reserved names",
    description = "Returns every reserved name, newest first.",
    responses(
        (status = 200, description = "All reserved names", body = ListResponse),
        (status = 503, description = "Storage unavailable (STORAGE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_names(State(state): State<AppState>) -> Result<Json<ListResponse>, AppError> {
    let names = state.registry.list_all().await?;

    Ok(Json(ListResponse {
        success: true,
        names: names.into_iter().map(Into::into).collect(),
    }))
}
