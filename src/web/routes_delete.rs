use super::*;

pub(super) async fn delete_dialog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found(&uri);
    };
    // The list underneath mounts alongside the dialog.
    let list = state.slice.get_entities();
    let entity = state.slice.get_entity(id);
    let ((listed, _), (fetched, mut snapshot)) = tokio::join!(list.settle(), entity.settle());
    match listed {
        Ok(items) => snapshot.entities = items,
        Err(e) => tracing::debug!("delete dialog list falls back to store state: {e}"),
    }
    if let Err(e) = fetched {
        tracing::debug!("delete dialog for {id} shows no loaded record: {e}");
        snapshot.entity = GameObject::default();
    }
    Html(delete_page(&snapshot, id)).into_response()
}

pub(super) async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found(&uri);
    };
    let (result, snapshot) = state.slice.delete_entity(id).settle().await;
    if result.is_ok() && snapshot.update_success {
        return back_to_list();
    }
    Html(delete_page(&snapshot, id)).into_response()
}
