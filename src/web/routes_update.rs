use super::*;

pub(super) async fn new_form(State(state): State<AppState>) -> Html<String> {
    let reset = state.slice.reset().await;
    Html(form_page(&reset, &reset.entity, None, None))
}

pub(super) async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found(&uri);
    };
    let (result, snapshot) = state.slice.get_entity(id).settle().await;
    match result {
        Ok(entity) => Html(form_page(&snapshot, &entity, Some(id), None)).into_response(),
        Err(e) => unavailable_form(&snapshot, id, &e.message),
    }
}

/// The record could not be loaded; never pre-fill with another record's values.
fn unavailable_form(snapshot: &StoreState, id: i64, message: &str) -> Response {
    let blank = GameObject {
        id: Some(id),
        ..GameObject::default_value()
    };
    (
        StatusCode::BAD_GATEWAY,
        Html(form_page(snapshot, &blank, Some(id), Some(message))),
    )
        .into_response()
}

pub(super) async fn save_new(State(state): State<AppState>, multipart: Multipart) -> Response {
    save(state, None, multipart).await
}

pub(super) async fn save_existing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
    multipart: Multipart,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found(&uri);
    };
    save(state, Some(id), multipart).await
}

/// The stored record an edit is merged over.
async fn base_entity(state: &AppState, id: i64) -> Result<GameObject, (StoreState, RejectedAction)> {
    let current = state.store().state().entity;
    if current.id == Some(id) {
        return Ok(current);
    }
    match state.slice.get_entity(id).settle().await {
        (Ok(entity), _) => Ok(entity),
        (Err(e), snapshot) => Err((snapshot, e)),
    }
}

async fn save(state: AppState, id: Option<i64>, multipart: Multipart) -> Response {
    let base = match id {
        None => GameObject::default_value(),
        Some(id) => match base_entity(&state, id).await {
            Ok(base) => base,
            Err((snapshot, e)) => return unavailable_form(&snapshot, id, &e.message),
        },
    };

    let form = match GameObjectForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => {
            let current = state.store().state();
            return (
                StatusCode::BAD_REQUEST,
                Html(form_page(&current, &base, id, Some(&e.to_string()))),
            )
                .into_response();
        }
    };

    let mut entity = form.apply_to(&base);
    entity.id = id;
    let task = match id {
        Some(_) => state.slice.update_entity(entity.clone()),
        None => state.slice.create_entity(entity.clone()),
    };
    let (result, snapshot) = task.settle().await;
    if result.is_ok() && snapshot.update_success {
        return back_to_list();
    }
    Html(form_page(&snapshot, &entity, id, None)).into_response()
}
