use crate::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use beacon_core::summary::{summarize, EventSummary};
use beacon_core::export::to_csv;
use beacon_events::EventRecord;
use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(Debug, serde::Deserialize, ToSchema)]
pub struct TrackInput {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: Map<String, Value>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/events",
            get(list_events).post(track_event).delete(clear_events),
        )
        .route("/events/summary", get(summary))
        .route("/events/export", get(export))
        .route("/events/subscribe", get(subscribe))
        .route("/events/stream", get(stream))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/events",
    responses((status = 200, body = Vec<EventRecord>))
)]
pub(crate) async fn list_events(State(state): State<AppState>) -> Json<Vec<EventRecord>> {
    Json(state.tracker.store().snapshot())
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = TrackInput,
    responses((status = 202))
)]
pub(crate) async fn track_event(
    State(state): State<AppState>,
    Json(input): Json<TrackInput>,
) -> StatusCode {
    // Fire-and-forget: rate-limit drops and sink absence are not surfaced.
    state.tracker.track(&input.event_type, input.data);
    StatusCode::ACCEPTED
}

#[utoipa::path(
    delete,
    path = "/api/events",
    responses((status = 204))
)]
pub(crate) async fn clear_events(State(state): State<AppState>) -> StatusCode {
    state.tracker.store().clear();
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/api/events/summary",
    responses((status = 200, body = EventSummary))
)]
pub(crate) async fn summary(State(state): State<AppState>) -> Json<EventSummary> {
    Json(summarize(&state.tracker.store().snapshot()))
}

#[utoipa::path(
    get,
    path = "/api/events/export",
    responses((status = 200, content_type = "text/csv"))
)]
pub(crate) async fn export(State(state): State<AppState>) -> Response {
    let csv = to_csv(&state.tracker.store().snapshot());
    ([(header::CONTENT_TYPE, "text/csv")], csv).into_response()
}

#[utoipa::path(
    get,
    path = "/api/events/subscribe",
    responses((status = 200))
)]
pub(crate) async fn subscribe(State(state): State<AppState>) -> Response {
    crate::sse::subscribe(state)
}

#[utoipa::path(
    get,
    path = "/api/events/stream",
    responses((status = 200))
)]
pub(crate) async fn stream(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_stream(socket, state))
}

async fn handle_stream(mut socket: WebSocket, state: AppState) {
    let mut receiver = state.tracker.store().subscribe();
    while let Ok(update) = receiver.recv().await {
        let json = serde_json::to_string(&update).unwrap_or_else(|_| "{}".to_string());
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use beacon_core::Tracker;
    use beacon_events::EventStore;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> (AppState, Router) {
        let state = AppState::new(Arc::new(Tracker::new(EventStore::default())));
        let app = crate::app(state.clone());
        (state, app)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn track_request(event_type: &str, data: Value) -> Request<Body> {
        let body = serde_json::json!({ "type": event_type, "data": data });
        Request::builder()
            .method("POST")
            .uri("/api/events")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_track_then_list() {
        let (_state, app) = test_app();

        let response = app
            .clone()
            .oneshot(track_request("page_view", serde_json::json!({"page": "cart"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let events = body_json(response).await;
        assert_eq!(events.as_array().unwrap().len(), 1);
        assert_eq!(events[0]["type"], "page_view");
        assert_eq!(events[0]["data"]["page"], "cart");
    }

    #[tokio::test]
    async fn test_clear_empties_log() {
        let (state, app) = test_app();
        state.tracker.track("page_view", Map::new());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.tracker.store().is_empty());
    }

    #[tokio::test]
    async fn test_summary_counts_types() {
        let (state, app) = test_app();
        state.tracker.track("page_view", Map::new());
        state.tracker.track("page_view", Map::new());
        state.tracker.track("add_to_cart", Map::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events/summary")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let summary = body_json(response).await;
        assert_eq!(summary["total_events"], 3);
        assert_eq!(summary["unique_event_types"], 2);
        assert_eq!(summary["counts"]["page_view"], 2);
    }

    #[tokio::test]
    async fn test_export_is_csv() {
        let (state, app) = test_app();
        state.tracker.track("form_submit", Map::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/events/export")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(csv.starts_with("Event Type,Timestamp,Data\n"));
        assert!(csv.contains("form_submit,"));
    }

    #[tokio::test]
    async fn test_track_with_missing_data_defaults_to_empty() {
        let (state, app) = test_app();
        let body = serde_json::json!({ "type": "button_click" });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/events")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let events = state.tracker.store().snapshot();
        assert!(events[0].data.is_empty());
    }
}
