use super::*;

fn state_event(state: &crate::store::StoreState) -> SseEvent {
    let payload = serde_json::to_string(state).unwrap_or_else(|_| "{}".to_string());
    SseEvent::default().event("state").data(payload)
}

/// Streams the store state now and after every reduction.
pub(super) async fn subscribe_state(State(state): State<AppState>) -> impl IntoResponse {
    let mut rx = state.store().subscribe();
    let stream = async_stream::stream! {
        let initial = rx.borrow_and_update().clone();
        yield Ok::<SseEvent, Infallible>(state_event(&initial));
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            yield Ok::<SseEvent, Infallible>(state_event(&snapshot));
        }
    };
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(std::time::Duration::from_secs(5))
            .text("keep-alive"),
    )
}
