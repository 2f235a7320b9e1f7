use serde::Serialize;

use crate::model::GameObject;

pub const SLICE_NAME: &str = "gameObject";

/// The seven asynchronous operations of the game object slice.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FetchEntityList,
    SearchEntities,
    FetchEntity,
    CreateEntity,
    UpdateEntity,
    PartialUpdateEntity,
    DeleteEntity,
}

impl Operation {
    pub fn type_prefix(self) -> &'static str {
        match self {
            Operation::FetchEntityList => "gameObject/fetch_entity_list",
            Operation::SearchEntities => "gameObject/search_entity",
            Operation::FetchEntity => "gameObject/fetch_entity",
            Operation::CreateEntity => "gameObject/create_entity",
            Operation::UpdateEntity => "gameObject/update_entity",
            Operation::PartialUpdateEntity => "gameObject/partial_update_entity",
            Operation::DeleteEntity => "gameObject/delete_entity",
        }
    }

    /// Reads toggle `loading`, writes toggle `updating`.
    pub fn is_read(self) -> bool {
        matches!(
            self,
            Operation::FetchEntityList | Operation::SearchEntities | Operation::FetchEntity
        )
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    List(Vec<GameObject>),
    Entity(GameObject),
    Deleted,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Action {
    Pending {
        op: Operation,
        request_id: u64,
    },
    Fulfilled {
        op: Operation,
        request_id: u64,
        payload: Payload,
    },
    Rejected {
        op: Operation,
        request_id: u64,
        error: String,
    },
    Reset,
}

impl Action {
    /// Redux-style action type, e.g. `gameObject/fetch_entity/fulfilled`.
    pub fn type_name(&self) -> String {
        match self {
            Action::Pending { op, .. } => format!("{}/pending", op.type_prefix()),
            Action::Fulfilled { op, .. } => format!("{}/fulfilled", op.type_prefix()),
            Action::Rejected { op, .. } => format!("{}/rejected", op.type_prefix()),
            Action::Reset => format!("{SLICE_NAME}/reset"),
        }
    }
}
