use super::*;
use axum::routing::get;

/// Most specific paths first; the delete dialog renders on top of the list.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to(BASE) }))
        .route("/game-object/new", get(new_form).post(save_new))
        .route("/game-object/events", get(subscribe_state))
        .route("/game-object/{id}/edit", get(edit_form).post(save_existing))
        .route(
            "/game-object/{id}/delete",
            get(delete_dialog).post(confirm_delete),
        )
        .route("/game-object/{id}", get(game_object_detail))
        .route("/game-object", get(game_object_list))
        .fallback(fallback)
        .with_state(state)
}

async fn fallback(uri: Uri) -> Response {
    not_found(&uri)
}
