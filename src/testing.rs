//! In-process stand-in for the game service, used by tests.

use axum::{
    body::Bytes,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::client::GameObjectClient;
use crate::config::GatewayConfig;
use crate::model::GameObject;

const API_ROOT: &str = "/services/gameservice/api";

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    /// Path below the API root, e.g. `/game-objects/3`.
    pub path: String,
    pub query: Option<String>,
    pub status: u16,
}

#[derive(Default)]
struct MockState {
    records: Vec<GameObject>,
    next_id: i64,
    log: Vec<RecordedRequest>,
    fail_with: Option<StatusCode>,
    delay: Option<Duration>,
}

type Shared = Arc<Mutex<MockState>>;

#[derive(Clone)]
pub struct MockGameService {
    state: Shared,
    pub base_url: String,
}

impl MockGameService {
    pub async fn start(seed: Vec<GameObject>) -> Self {
        let next_id = seed.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1;
        let state = Arc::new(Mutex::new(MockState {
            records: seed,
            next_id,
            ..Default::default()
        }));
        let app = Router::new()
            .route(
                &format!("{API_ROOT}/game-objects"),
                get(list).post(create),
            )
            .route(
                &format!("{API_ROOT}/game-objects/{{id}}"),
                get(get_one).put(update).patch(patch).delete(remove),
            )
            .route(&format!("{API_ROOT}/_search/game-objects"), get(search))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock game service");
        let addr = listener.local_addr().expect("mock address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            state,
            base_url: format!("http://{addr}/"),
        }
    }

    pub fn config(&self) -> GatewayConfig {
        GatewayConfig {
            service_url: self.base_url.clone(),
            ..Default::default()
        }
    }

    pub fn client(&self) -> GameObjectClient {
        GameObjectClient::new(&self.config()).expect("mock client")
    }

    pub fn log(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn records(&self) -> Vec<GameObject> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn fail_with(&self, status: Option<StatusCode>) {
        self.state.lock().unwrap().fail_with = status;
    }

    /// Hold every response back by `delay` before answering.
    pub fn delay(&self, delay: Option<Duration>) {
        self.state.lock().unwrap().delay = delay;
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.statuses(method, path).len()
    }

    pub fn statuses(&self, method: &str, path: &str) -> Vec<u16> {
        self.log()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .map(|r| r.status)
            .collect()
    }
}

/// Poll `cond` for up to two seconds.
pub async fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    cond()
}

async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .uri()
        .path()
        .strip_prefix(API_ROOT)
        .unwrap_or(req.uri().path())
        .to_string();
    let query = req.uri().query().map(str::to_string);
    let (forced, delay) = {
        let state = state.lock().unwrap();
        (state.fail_with, state.delay)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let res = match forced {
        Some(status) => problem(status),
        None => next.run(req).await,
    };
    state.lock().unwrap().log.push(RecordedRequest {
        method,
        path,
        query,
        status: res.status().as_u16(),
    });
    res
}

fn problem(status: StatusCode) -> Response {
    let body = serde_json::json!({
        "title": status.canonical_reason().unwrap_or("Error"),
        "status": status.as_u16(),
    });
    (status, Json(body)).into_response()
}

fn parse(body: &Bytes) -> Result<GameObject, Response> {
    serde_json::from_slice(body).map_err(|_| problem(StatusCode::BAD_REQUEST))
}

async fn list(State(state): State<Shared>) -> Json<Vec<GameObject>> {
    Json(state.lock().unwrap().records.clone())
}

async fn search(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(query) = params.get("query") else {
        return problem(StatusCode::BAD_REQUEST);
    };
    let hits: Vec<GameObject> = state
        .lock()
        .unwrap()
        .records
        .iter()
        .filter(|r| {
            query == "*"
                || serde_json::to_string(r)
                    .map(|json| json.contains(query.as_str()))
                    .unwrap_or(false)
        })
        .cloned()
        .collect();
    Json(hits).into_response()
}

async fn get_one(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = state.lock().unwrap();
    match state.records.iter().find(|r| r.id == Some(id)) {
        Some(found) => Json(found.clone()).into_response(),
        None => problem(StatusCode::NOT_FOUND),
    }
}

async fn create(State(state): State<Shared>, body: Bytes) -> Response {
    let mut obj = match parse(&body) {
        Ok(obj) => obj,
        Err(res) => return res,
    };
    if obj.id.is_some() {
        return problem(StatusCode::BAD_REQUEST);
    }
    let mut state = state.lock().unwrap();
    obj.id = Some(state.next_id);
    state.next_id += 1;
    state.records.push(obj.clone());
    (StatusCode::CREATED, Json(obj)).into_response()
}

async fn update(State(state): State<Shared>, Path(id): Path<i64>, body: Bytes) -> Response {
    let obj = match parse(&body) {
        Ok(obj) => obj,
        Err(res) => return res,
    };
    if obj.id != Some(id) {
        return problem(StatusCode::BAD_REQUEST);
    }
    let mut state = state.lock().unwrap();
    match state.records.iter_mut().find(|r| r.id == Some(id)) {
        Some(existing) => {
            *existing = obj.clone();
            Json(obj).into_response()
        }
        None => problem(StatusCode::BAD_REQUEST),
    }
}

async fn patch(State(state): State<Shared>, Path(id): Path<i64>, body: Bytes) -> Response {
    let obj = match parse(&body) {
        Ok(obj) => obj,
        Err(res) => return res,
    };
    if obj.id != Some(id) {
        return problem(StatusCode::BAD_REQUEST);
    }
    let mut state = state.lock().unwrap();
    match state.records.iter_mut().find(|r| r.id == Some(id)) {
        Some(existing) => {
            *existing = existing.merge(&obj);
            Json(existing.clone()).into_response()
        }
        None => problem(StatusCode::BAD_REQUEST),
    }
}

async fn remove(State(state): State<Shared>, Path(id): Path<i64>) -> StatusCode {
    state.lock().unwrap().records.retain(|r| r.id != Some(id));
    StatusCode::NO_CONTENT
}
