use super::*;

pub(super) async fn game_object_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found(&uri);
    };
    let (result, mut snapshot) = state.slice.get_entity(id).settle().await;
    if let Err(e) = result {
        tracing::debug!("detail for {id} has no record to show: {e}");
        snapshot.entity = GameObject::default();
    }
    Html(detail_page(&snapshot)).into_response()
}
