use serde::Serialize;

use super::actions::{Action, Operation, Payload};
use crate::model::GameObject;

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub loading: bool,
    pub error_message: Option<String>,
    pub entities: Vec<GameObject>,
    pub entity: GameObject,
    pub updating: bool,
    pub update_success: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            loading: false,
            error_message: None,
            entities: Vec::new(),
            entity: GameObject::default_value(),
            updating: false,
            update_success: false,
        }
    }
}

pub fn reduce(state: &mut StoreState, action: &Action) {
    match action {
        Action::Reset => *state = StoreState::default(),
        Action::Pending { op, .. } => {
            state.error_message = None;
            state.update_success = false;
            if op.is_read() {
                state.loading = true;
            } else {
                state.updating = true;
            }
        }
        Action::Fulfilled { op, payload, .. } => fulfilled(state, *op, payload),
        Action::Rejected { op, error, .. } => {
            if op.is_read() {
                state.loading = false;
                state.error_message = Some(error.clone());
            } else {
                state.updating = false;
                state.update_success = false;
            }
        }
    }
}

fn fulfilled(state: &mut StoreState, op: Operation, payload: &Payload) {
    match (op, payload) {
        (Operation::FetchEntityList | Operation::SearchEntities, Payload::List(items)) => {
            state.loading = false;
            state.entities = items.clone();
        }
        (Operation::FetchEntity, Payload::Entity(entity)) => {
            state.loading = false;
            state.entity = entity.clone();
        }
        (
            Operation::CreateEntity | Operation::UpdateEntity | Operation::PartialUpdateEntity,
            Payload::Entity(entity),
        ) => {
            state.updating = false;
            state.loading = false;
            state.update_success = true;
            state.entity = entity.clone();
        }
        (Operation::DeleteEntity, _) => {
            state.updating = false;
            state.update_success = true;
            state.entity = GameObject::default();
        }
        (op, payload) => {
            tracing::warn!("ignoring {op:?} fulfilled with mismatched payload {payload:?}");
        }
    }
}
