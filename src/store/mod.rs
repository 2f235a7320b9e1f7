mod actions;
mod reducer;
mod slice;

use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};

pub use actions::{Action, Operation, Payload};
pub use reducer::{reduce, StoreState};
pub use slice::{ActionTask, GameObjectSlice, RejectedAction};

/// Messages accepted by the store runtime thread.
enum StoreCommand {
    Dispatch(Action, Option<oneshot::Sender<StoreState>>),
}

/// Handle to the single store instance. Cheap to clone.
///
/// Reductions happen one at a time on the runtime thread, in the order the
/// actions were sent.
#[derive(Clone)]
pub struct Store {
    sender: Sender<StoreCommand>,
    state: watch::Receiver<StoreState>,
    next_request_id: Arc<AtomicU64>,
}

impl Store {
    pub fn spawn() -> std::io::Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded::<StoreCommand>();
        let (state_tx, state_rx) = watch::channel(StoreState::default());
        std::thread::Builder::new()
            .name("game-object-store".to_string())
            .spawn(move || run_store(rx, state_tx))?;
        Ok(Self {
            sender: tx,
            state: state_rx,
            next_request_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Queue an action without waiting for it to be reduced.
    pub fn dispatch(&self, action: Action) {
        if self.sender.send(StoreCommand::Dispatch(action, None)).is_err() {
            tracing::warn!("store runtime has stopped; action dropped");
        }
    }

    /// Queue an action and wait for the state it produced.
    pub async fn dispatch_and_wait(&self, action: Action) -> StoreState {
        let (tx, rx) = oneshot::channel();
        if self.sender.send(StoreCommand::Dispatch(action, Some(tx))).is_err() {
            tracing::warn!("store runtime has stopped; action dropped");
            return self.state();
        }
        match rx.await {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }

    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.clone()
    }

    fn next_request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }
}

fn run_store(receiver: Receiver<StoreCommand>, publisher: watch::Sender<StoreState>) {
    let mut state = StoreState::default();
    for command in receiver.iter() {
        match command {
            StoreCommand::Dispatch(action, reply) => {
                tracing::debug!("{}", action.type_name());
                reduce(&mut state, &action);
                publisher.send_replace(state.clone());
                if let Some(reply) = reply {
                    let _ = reply.send(state.clone());
                }
            }
        }
    }
    tracing::debug!("store runtime stopped");
}
