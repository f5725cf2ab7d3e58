use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::names::check_name))
        .routes(routes!(handlers::names::add_name))
        .routes(routes!(handlers::names::batch_add_names))
        .routes(routes!(handlers::names::list_names))
}
