use super::routes::GameObjectRoute;
use crate::model::{byte_size, GameObject};
use crate::store::StoreState;

pub(super) fn esc(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"/>\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\"/>\
         <title>{}</title>\
         <style>body{{font-family:ui-sans-serif,system-ui,sans-serif;margin:24px;line-height:1.4;}}\
         table{{border-collapse:collapse;width:100%;margin-top:12px;}}\
         th,td{{border:1px solid #ddd;padding:8px;text-align:left;vertical-align:top;}}\
         th{{background:#f5f5f5;}}.btn{{display:inline-block;padding:4px 10px;margin-right:4px;\
         border:1px solid #888;border-radius:4px;text-decoration:none;color:inherit;background:#fafafa;}}\
         .alert{{padding:8px 12px;border-radius:4px;background:#fff3cd;margin-top:12px;}}\
         .alert-danger{{background:#f8d7da;}}\
         .modal-backdrop{{position:fixed;inset:0;background:rgba(0,0,0,0.4);}}\
         .modal{{position:fixed;top:20%;left:50%;transform:translateX(-50%);background:#fff;\
         padding:16px 24px;border-radius:6px;min-width:320px;}}\
         dl.details dt{{font-weight:bold;}}label{{display:block;margin-top:8px;}}</style></head>\
         <body>{}</body></html>",
        esc(title),
        body
    )
}

fn number(value: Option<f32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: Option<bool>) -> &'static str {
    if value.unwrap_or(false) {
        "true"
    } else {
        "false"
    }
}

fn id_text(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn bitmap_summary(obj: &GameObject) -> String {
    let Some(bitmap) = obj.bitmap.as_deref().filter(|b| !b.is_empty()) else {
        return String::new();
    };
    let open = obj
        .bitmap_data_url()
        .map(|url| {
            format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">Open</a>&nbsp;",
                esc(&url)
            )
        })
        .unwrap_or_default();
    format!(
        "<div>{open}<span>{}, {}</span></div>",
        esc(obj.bitmap_content_type.as_deref().unwrap_or("")),
        byte_size(bitmap)
    )
}

fn list_view(state: &StoreState, search: &str) -> String {
    let list = GameObjectRoute::List.path();
    let mut html = format!(
        "<h2 id=\"game-object-heading\" data-cy=\"GameObjectHeading\">Game Objects</h2>\
         <div><a class=\"btn\" href=\"{list}\">Refresh List</a>\
         <a class=\"btn\" id=\"jh-create-entity\" data-cy=\"entityCreateButton\" href=\"{}\">Create new Game Object</a></div>\
         <form method=\"get\" action=\"{list}\">\
         <input type=\"text\" name=\"search\" value=\"{}\" placeholder=\"Search for Game Object\"/>\
         <button type=\"submit\">Search</button> <a class=\"btn\" href=\"{list}\">Clear</a></form>",
        GameObjectRoute::New.path(),
        esc(search)
    );

    if state.entities.is_empty() {
        if !state.loading {
            html.push_str("<div class=\"alert\">No Game Objects found</div>");
        }
        return html;
    }

    html.push_str(
        "<table><thead><tr><th>ID</th><th>X</th><th>Y</th><th>Bitmap</th><th>Is Enabled</th><th></th></tr></thead><tbody>",
    );
    for obj in &state.entities {
        let actions = match obj.id {
            Some(id) => format!(
                "<a class=\"btn\" data-cy=\"entityDetailsButton\" href=\"{}\">View</a>\
                 <a class=\"btn\" data-cy=\"entityEditButton\" href=\"{}\">Edit</a>\
                 <a class=\"btn\" data-cy=\"entityDeleteButton\" href=\"{}\">Delete</a>",
                GameObjectRoute::Detail(id).path(),
                GameObjectRoute::Edit(id).path(),
                GameObjectRoute::Delete(id).path()
            ),
            None => String::new(),
        };
        let id_cell = match obj.id {
            Some(id) => format!("<a href=\"{}\">{id}</a>", GameObjectRoute::Detail(id).path()),
            None => String::new(),
        };
        html.push_str(&format!(
            "<tr data-cy=\"entityTable\"><td>{id_cell}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{actions}</td></tr>",
            number(obj.x),
            number(obj.y),
            bitmap_summary(obj),
            flag(obj.is_enabled)
        ));
    }
    html.push_str("</tbody></table>");
    html
}

pub(super) fn list_page(state: &StoreState, search: &str) -> String {
    page("Game Objects", &list_view(state, search))
}

pub(super) fn detail_page(state: &StoreState) -> String {
    let obj = &state.entity;
    let edit = obj
        .id
        .map(|id| {
            format!(
                "<a class=\"btn\" href=\"{}\">Edit</a>",
                GameObjectRoute::Edit(id).path()
            )
        })
        .unwrap_or_default();
    let body = format!(
        "<h2 data-cy=\"gameObjectDetailsHeading\">GameObject</h2>\
         <dl class=\"details\">\
         <dt><span id=\"id\">ID</span></dt><dd>{}</dd>\
         <dt><span id=\"x\">X</span></dt><dd>{}</dd>\
         <dt><span id=\"y\">Y</span></dt><dd>{}</dd>\
         <dt><span id=\"bitmap\">Bitmap</span></dt><dd>{}</dd>\
         <dt><span id=\"isEnabled\">Is Enabled</span></dt><dd>{}</dd>\
         </dl>\
         <a class=\"btn\" data-cy=\"entityDetailsBackButton\" href=\"{}\">Back</a>{edit}",
        id_text(obj.id),
        number(obj.x),
        number(obj.y),
        bitmap_summary(obj),
        flag(obj.is_enabled),
        GameObjectRoute::List.path()
    );
    page("GameObject", &body)
}

/// Create/edit form pre-filled from `values`. `edit_id` is `None` for a new record.
pub(super) fn form_page(
    state: &StoreState,
    values: &GameObject,
    edit_id: Option<i64>,
    error: Option<&str>,
) -> String {
    let mut body = String::from(
        "<h2 id=\"game-object-create-edit\" data-cy=\"GameObjectCreateUpdateHeading\">Create or edit a GameObject</h2>",
    );
    if let Some(error) = error {
        body.push_str(&format!(
            "<div class=\"alert alert-danger\">{}</div>",
            esc(error)
        ));
    }
    if state.loading {
        body.push_str("<p>Loading...</p>");
        return page("Create or edit a GameObject", &body);
    }

    let action = match edit_id {
        Some(id) => GameObjectRoute::Edit(id).path(),
        None => GameObjectRoute::New.path(),
    };
    body.push_str(&format!(
        "<form method=\"post\" enctype=\"multipart/form-data\" action=\"{action}\">"
    ));
    if let Some(id) = edit_id {
        body.push_str(&format!(
            "<label for=\"game-object-id\">ID</label>\
             <input type=\"text\" id=\"game-object-id\" name=\"id\" value=\"{id}\" readonly/>"
        ));
    }
    let current_bitmap = if values.bitmap.as_deref().is_some_and(|b| !b.is_empty()) {
        format!(
            "{}<label><input type=\"checkbox\" name=\"bitmapClear\" data-cy=\"bitmapClear\"/> Remove bitmap</label>",
            bitmap_summary(values)
        )
    } else {
        String::new()
    };
    body.push_str(&format!(
        "<label for=\"game-object-x\">X</label>\
         <input type=\"text\" id=\"game-object-x\" name=\"x\" data-cy=\"x\" value=\"{}\"/>\
         <label for=\"game-object-y\">Y</label>\
         <input type=\"text\" id=\"game-object-y\" name=\"y\" data-cy=\"y\" value=\"{}\"/>\
         <label for=\"game-object-bitmap\">Bitmap</label>{current_bitmap}\
         <input type=\"file\" id=\"game-object-bitmap\" name=\"bitmap\" data-cy=\"bitmap\" accept=\"image/*\"/>\
         <label><input type=\"checkbox\" id=\"game-object-isEnabled\" name=\"isEnabled\" data-cy=\"isEnabled\"{}/> Is Enabled</label>\
         <p><a class=\"btn\" id=\"cancel-save\" data-cy=\"entityCreateCancelButton\" href=\"{}\">Back</a>\
         <button type=\"submit\" id=\"save-entity\" data-cy=\"entityCreateSaveButton\"{}>Save</button></p>\
         </form>",
        number(values.x),
        number(values.y),
        if values.is_enabled.unwrap_or(false) { " checked" } else { "" },
        GameObjectRoute::List.path(),
        if state.updating { " disabled" } else { "" }
    ));
    page("Create or edit a GameObject", &body)
}

/// List page with the delete confirmation layered on top.
pub(super) fn delete_page(state: &StoreState, id: i64) -> String {
    let shown_id = state.entity.id.unwrap_or(id);
    let list = GameObjectRoute::List.path();
    let dialog = format!(
        "<div class=\"modal-backdrop\"></div>\
         <div class=\"modal\" role=\"dialog\">\
         <h3 data-cy=\"gameObjectDeleteDialogHeading\">Confirm delete operation</h3>\
         <p id=\"gameObjectDeleteQuestion\">Are you sure you want to delete GameObject {shown_id}?</p>\
         <form method=\"post\" action=\"{}\">\
         <a class=\"btn\" href=\"{list}\">Cancel</a>\
         <button type=\"submit\" id=\"jhi-confirm-delete-gameObject\" data-cy=\"entityConfirmDeleteButton\"{}>Delete</button>\
         </form></div>",
        GameObjectRoute::Delete(id).path(),
        if state.updating { " disabled" } else { "" }
    );
    page("Game Objects", &format!("{}{dialog}", list_view(state, "")))
}

pub(super) fn not_found_page(path: &str) -> String {
    page(
        "Not found",
        &format!(
            "<h2>Page not found</h2><p><code>{}</code> does not exist.</p><a class=\"btn\" href=\"{}\">Game Objects</a>",
            esc(path),
            GameObjectRoute::List.path()
        ),
    )
}
