use crate::routes::events::TrackInput;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use beacon_core::summary::{EventSummary, TypeCount};
use beacon_events::types::{EventRecord, StoreUpdate};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::events::list_events,
        crate::routes::events::track_event,
        crate::routes::events::clear_events,
        crate::routes::events::summary,
        crate::routes::events::export,
        crate::routes::events::subscribe,
        crate::routes::events::stream,
    ),
    components(schemas(EventRecord, StoreUpdate, TrackInput, EventSummary, TypeCount)),
    info(title = "Beacon API", description = "Analytics event tracking demo API")
)]
pub struct ApiDoc;

pub fn generate_spec() -> String {
    ApiDoc::openapi()
        .to_json()
        .unwrap_or_else(|_| "{}".to_string())
}

pub fn router() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
