use super::*;

#[derive(serde::Deserialize, Default)]
pub(super) struct ListQuery {
    #[serde(default)]
    search: String,
}

/// Plain list fetch, or a search when the box was submitted with text.
pub(super) async fn game_object_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Html<String> {
    let task = if query.search.is_empty() {
        state.slice.get_entities()
    } else {
        state.slice.search_entities(&query.search)
    };
    let request_id = task.request_id();
    let (result, snapshot) = task.settle().await;
    match result {
        Ok(items) => tracing::debug!("list request {request_id} returned {} rows", items.len()),
        Err(e) => tracing::debug!("list request {request_id} failed, showing store state: {e}"),
    }
    Html(list_page(&snapshot, &query.search))
}
