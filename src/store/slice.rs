use std::future::Future;

use super::{Action, Operation, Payload, Store, StoreState};
use crate::client::{ClientError, GameObjectClient};
use crate::model::GameObject;

#[derive(Debug, Clone, thiserror::Error)]
#[error("{} rejected: {message}", .op.type_prefix())]
pub struct RejectedAction {
    pub op: Operation,
    pub message: String,
}

/// A running asynchronous action.
///
/// Its `Pending` action is already queued when the task is returned; awaiting
/// `outcome` or `settle` yields after the matching `Fulfilled` or `Rejected`
/// has been reduced.
pub struct ActionTask<T> {
    op: Operation,
    request_id: u64,
    store: Store,
    handle: tokio::task::JoinHandle<(Result<T, RejectedAction>, StoreState)>,
}

impl<T> ActionTask<T> {
    pub fn op(&self) -> Operation {
        self.op
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn is_pending(&self) -> bool {
        !self.handle.is_finished()
    }

    pub async fn outcome(self) -> Result<T, RejectedAction> {
        self.settle().await.0
    }

    /// The result plus the state produced by reducing this action's own
    /// `Fulfilled`/`Rejected`. Later reductions from other callers are not in
    /// the snapshot.
    pub async fn settle(self) -> (Result<T, RejectedAction>, StoreState) {
        match self.handle.await {
            Ok(settled) => settled,
            Err(e) => (
                Err(RejectedAction {
                    op: self.op,
                    message: e.to_string(),
                }),
                self.store.state(),
            ),
        }
    }
}

impl<T> std::fmt::Debug for ActionTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionTask")
            .field("op", &self.op)
            .field("request_id", &self.request_id)
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Async actions of the game object slice: the store plus the client it calls.
///
/// Every method must be called from inside a tokio runtime.
#[derive(Clone)]
pub struct GameObjectSlice {
    store: Store,
    client: GameObjectClient,
}

impl GameObjectSlice {
    pub fn new(store: Store, client: GameObjectClient) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn get_entities(&self) -> ActionTask<Vec<GameObject>> {
        let client = self.client.clone();
        self.run(
            Operation::FetchEntityList,
            async move { client.list().await.map(|res| res.data) },
            |items: &Vec<GameObject>| Payload::List(items.clone()),
        )
    }

    pub fn search_entities(&self, query: &str) -> ActionTask<Vec<GameObject>> {
        let client = self.client.clone();
        let query = query.to_string();
        self.run(
            Operation::SearchEntities,
            async move { client.search(&query).await.map(|res| res.data) },
            |items: &Vec<GameObject>| Payload::List(items.clone()),
        )
    }

    pub fn get_entity(&self, id: i64) -> ActionTask<GameObject> {
        let client = self.client.clone();
        self.run(
            Operation::FetchEntity,
            async move { client.get_by_id(id).await.map(|res| res.data) },
            |entity: &GameObject| Payload::Entity(entity.clone()),
        )
    }

    pub fn create_entity(&self, entity: GameObject) -> ActionTask<GameObject> {
        let client = self.client.clone();
        self.run(
            Operation::CreateEntity,
            async move { client.create(&entity).await.map(|res| res.data) },
            |entity: &GameObject| Payload::Entity(entity.clone()),
        )
    }

    pub fn update_entity(&self, entity: GameObject) -> ActionTask<GameObject> {
        let client = self.client.clone();
        self.run(
            Operation::UpdateEntity,
            async move { client.update(&entity).await.map(|res| res.data) },
            |entity: &GameObject| Payload::Entity(entity.clone()),
        )
    }

    pub fn partial_update_entity(&self, entity: GameObject) -> ActionTask<GameObject> {
        let client = self.client.clone();
        self.run(
            Operation::PartialUpdateEntity,
            async move { client.partial_update(&entity).await.map(|res| res.data) },
            |entity: &GameObject| Payload::Entity(entity.clone()),
        )
    }

    pub fn delete_entity(&self, id: i64) -> ActionTask<()> {
        let client = self.client.clone();
        self.run(
            Operation::DeleteEntity,
            async move { client.delete_by_id(id).await.map(|res| res.data) },
            |_: &()| Payload::Deleted,
        )
    }

    /// Back to the initial state; returns it once reduced.
    pub async fn reset(&self) -> StoreState {
        self.store.dispatch_and_wait(Action::Reset).await
    }

    fn run<T, Fut>(
        &self,
        op: Operation,
        request: Fut,
        payload: impl FnOnce(&T) -> Payload + Send + 'static,
    ) -> ActionTask<T>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let request_id = self.store.next_request_id();
        self.store.dispatch(Action::Pending { op, request_id });
        let slice = self.clone();
        let handle = tokio::spawn(async move {
            match request.await {
                Ok(value) => {
                    if !op.is_read() {
                        // Not awaited: the refreshed list may land after the caller moves on.
                        let _ = slice.get_entities();
                    }
                    let snapshot = slice
                        .store
                        .dispatch_and_wait(Action::Fulfilled {
                            op,
                            request_id,
                            payload: payload(&value),
                        })
                        .await;
                    (Ok(value), snapshot)
                }
                Err(e) => {
                    let message = e.to_string();
                    match e.detail() {
                        Some(detail) => tracing::warn!(
                            "{}/rejected (request {request_id}): {message} ({detail})",
                            op.type_prefix()
                        ),
                        None => tracing::warn!(
                            "{}/rejected (request {request_id}): {message}",
                            op.type_prefix()
                        ),
                    }
                    let snapshot = slice
                        .store
                        .dispatch_and_wait(Action::Rejected {
                            op,
                            request_id,
                            error: message.clone(),
                        })
                        .await;
                    (Err(RejectedAction { op, message }), snapshot)
                }
            }
        });
        ActionTask {
            op,
            request_id,
            store: self.store.clone(),
            handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{wait_until, MockGameService};

    fn sample(id: i64) -> GameObject {
        GameObject {
            id: Some(id),
            x: Some(1.0),
            y: Some(2.0),
            is_enabled: Some(true),
            ..Default::default()
        }
    }

    async fn slice_for(mock: &MockGameService) -> GameObjectSlice {
        let store = Store::spawn().expect("store");
        GameObjectSlice::new(store, mock.client())
    }

    #[tokio::test]
    async fn get_entities_fills_list_in_backend_order() {
        let mock = MockGameService::start(vec![sample(2), sample(1)]).await;
        let slice = slice_for(&mock).await;
        let task = slice.get_entities();
        assert_eq!(task.op(), Operation::FetchEntityList);
        let items = task.outcome().await.expect("list");
        assert_eq!(items.len(), 2);
        let state = slice.store().state();
        assert!(!state.loading);
        let ids: Vec<_> = state.entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Some(2), Some(1)]);
    }

    #[tokio::test]
    async fn get_entity_rejection_sets_error_message() {
        let mock = MockGameService::start(vec![]).await;
        let slice = slice_for(&mock).await;
        let err = slice.get_entity(404).outcome().await.expect_err("missing");
        assert_eq!(err.op, Operation::FetchEntity);
        let state = slice.store().state();
        assert!(!state.loading);
        assert_eq!(
            state.error_message.as_deref(),
            Some("Request failed with status code 404")
        );
    }

    #[tokio::test]
    async fn create_sets_entity_success_and_refetches_list() {
        let mock = MockGameService::start(vec![]).await;
        let slice = slice_for(&mock).await;
        let created = slice
            .create_entity(GameObject {
                x: Some(96424.0),
                ..GameObject::default_value()
            })
            .outcome()
            .await
            .expect("create");
        assert!(created.id.is_some());
        let state = slice.store().state();
        assert!(state.update_success);
        assert_eq!(state.entity, created);
        assert!(wait_until(|| mock.count("GET", "/game-objects") >= 1).await);
        assert!(wait_until(|| slice.store().state().entities.len() == 1).await);
    }

    #[tokio::test]
    async fn update_and_partial_update_replace_entity() {
        let mock = MockGameService::start(vec![sample(5)]).await;
        let slice = slice_for(&mock).await;
        let updated = slice
            .update_entity(GameObject {
                x: Some(10.0),
                ..sample(5)
            })
            .outcome()
            .await
            .expect("update");
        assert_eq!(updated.x, Some(10.0));
        assert!(slice.store().state().update_success);

        let patched = slice
            .partial_update_entity(GameObject {
                id: Some(5),
                is_enabled: Some(false),
                ..Default::default()
            })
            .outcome()
            .await
            .expect("patch");
        assert_eq!(patched.x, Some(10.0));
        assert_eq!(patched.is_enabled, Some(false));
        assert_eq!(slice.store().state().entity, patched);
        assert!(mock.count("PATCH", "/game-objects/5") == 1);
        assert!(wait_until(|| mock.count("GET", "/game-objects") >= 2).await);
    }

    #[tokio::test]
    async fn delete_clears_entity_to_empty() {
        let mock = MockGameService::start(vec![sample(3)]).await;
        let slice = slice_for(&mock).await;
        slice.get_entity(3).outcome().await.expect("fetch");
        slice.delete_entity(3).outcome().await.expect("delete");
        let state = slice.store().state();
        assert_eq!(state.entity, GameObject::default());
        assert!(state.update_success);
        assert_eq!(mock.statuses("DELETE", "/game-objects/3"), vec![204]);
    }

    #[tokio::test]
    async fn write_rejection_leaves_no_success() {
        let mock = MockGameService::start(vec![]).await;
        let slice = slice_for(&mock).await;
        let err = slice
            .update_entity(sample(77))
            .outcome()
            .await
            .expect_err("unknown id");
        assert_eq!(err.op, Operation::UpdateEntity);
        let state = slice.store().state();
        assert!(!state.updating);
        assert!(!state.update_success);
        assert_eq!(mock.count("GET", "/game-objects"), 0);
    }

    #[tokio::test]
    async fn task_is_pending_until_the_response_is_reduced() {
        let mock = MockGameService::start(vec![sample(1)]).await;
        mock.delay(Some(std::time::Duration::from_millis(200)));
        let slice = slice_for(&mock).await;
        let task = slice.get_entity(1);
        assert!(task.is_pending());
        assert!(wait_until(|| slice.store().state().loading).await);
        assert!(task.is_pending());

        assert!(wait_until(|| !task.is_pending()).await);
        let (result, snapshot) = task.settle().await;
        assert_eq!(result.expect("fetch").id, Some(1));
        assert!(!snapshot.loading);
        assert_eq!(snapshot.entity.id, Some(1));
    }

    #[tokio::test]
    async fn settle_reports_own_write_success() {
        let mock = MockGameService::start(vec![]).await;
        let slice = slice_for(&mock).await;
        let (result, snapshot) = slice.create_entity(GameObject::default_value()).settle().await;
        // A later read from another caller clears update_success in the store.
        let _ = slice.get_entities();
        assert!(result.is_ok());
        assert!(snapshot.update_success);
        assert!(wait_until(|| !slice.store().state().update_success).await);
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let mock = MockGameService::start(vec![sample(1)]).await;
        let slice = slice_for(&mock).await;
        slice.get_entity(1).outcome().await.expect("fetch");
        let state = slice.reset().await;
        assert_eq!(state.entity, GameObject::default_value());
        assert!(!state.update_success);
        assert!(state.entities.is_empty());
    }
}
