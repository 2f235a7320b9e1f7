pub const BASE: &str = "/game-object";

/// Every page of the game object UI. `path()` builds the links between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameObjectRoute {
    List,
    New,
    Detail(i64),
    Edit(i64),
    Delete(i64),
}

impl GameObjectRoute {
    pub fn path(self) -> String {
        match self {
            GameObjectRoute::List => BASE.to_string(),
            GameObjectRoute::New => format!("{BASE}/new"),
            GameObjectRoute::Detail(id) => format!("{BASE}/{id}"),
            GameObjectRoute::Edit(id) => format!("{BASE}/{id}/edit"),
            GameObjectRoute::Delete(id) => format!("{BASE}/{id}/delete"),
        }
    }
}

pub(super) fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}
