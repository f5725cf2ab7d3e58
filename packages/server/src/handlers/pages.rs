use axum::{Json, extract::State, response::Html};

use crate::models::names::HealthResponse;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Landing page with the check/add form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "health",
    summary = "Liveness probe",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        backend: state.registry.backend(),
    })
}
