mod form;
mod render;
mod router;
mod routes;
mod routes_delete;
mod routes_detail;
mod routes_events;
mod routes_list;
mod routes_update;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, Uri},
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        Html, IntoResponse, Redirect, Response,
    },
    Router,
};
use std::convert::Infallible;

use crate::client::{ClientError, GameObjectClient};
use crate::config::GatewayConfig;
use crate::model::GameObject;
use crate::store::{GameObjectSlice, RejectedAction, Store, StoreState};
use form::*;
use render::*;
use routes::parse_id;
use routes_delete::*;
use routes_detail::*;
use routes_events::*;
use routes_list::*;
use routes_update::*;

pub use router::build_router;
pub use routes::{GameObjectRoute, BASE};

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to start on {bind}: {source}")]
    Bind {
        bind: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub slice: GameObjectSlice,
}

impl AppState {
    pub fn new(config: &GatewayConfig) -> Result<Self, ServeError> {
        let client = GameObjectClient::new(config)?;
        let store = Store::spawn()?;
        Ok(Self {
            slice: GameObjectSlice::new(store, client),
        })
    }

    fn store(&self) -> &Store {
        self.slice.store()
    }
}

pub async fn serve(config: GatewayConfig) -> Result<(), ServeError> {
    let state = AppState::new(&config)?;
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|source| ServeError::Bind {
            bind: config.bind.clone(),
            source,
        })?;
    tracing::info!(
        "[Gateway] Listening on http://{} (game service at {})",
        listener.local_addr()?,
        config.service_url
    );
    axum::serve(listener, app).await?;
    Ok(())
}

/// Navigation back to the list after a successful write.
fn back_to_list() -> Response {
    Redirect::to(&GameObjectRoute::List.path()).into_response()
}

fn not_found(uri: &Uri) -> Response {
    (StatusCode::NOT_FOUND, Html(not_found_page(uri.path()))).into_response()
}
