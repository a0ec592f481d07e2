use crate::AppState;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use beacon_events::StoreUpdate;
use futures::stream::{self, StreamExt};
use tokio_stream::wrappers::BroadcastStream;

/// SSE feed: replays the current log as `appended` updates, then follows
/// with live store changes. A lagging receiver silently skips updates; the
/// client re-fetches the snapshot when it cares about completeness.
pub fn subscribe(state: AppState) -> Response {
    let receiver = state.tracker.store().subscribe();
    let history = state.tracker.store().snapshot();

    let history_stream = stream::iter(history.into_iter().map(|record| {
        let update = StoreUpdate::Appended(record);
        let json = serde_json::to_string(&update).unwrap_or_else(|_| "{}".to_string());
        Ok::<Event, std::convert::Infallible>(Event::default().data(json))
    }));

    let live_stream = BroadcastStream::new(receiver).filter_map(|item| async {
        match item {
            Ok(update) => {
                let json = serde_json::to_string(&update).unwrap_or_else(|_| "{}".to_string());
                Some(Ok(Event::default().data(json)))
            }
            Err(_) => None,
        }
    });

    let stream = history_stream.chain(live_stream);
    Sse::new(stream).into_response()
}
