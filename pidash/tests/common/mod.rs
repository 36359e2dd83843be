//! Shared test fixtures: a local stand-in for the metrics API and a scripted
//! interaction provider.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use pidash::interact::Interaction;

pub const API_KEY: &str = "s3cret";

pub const SAMPLE: &str = r#"{"Current Time":"12:00","IP Address":"10.0.0.1","CPU Usage":"5%","SoC Temperature":"40C","Total RAM":"8GB","Used RAM":"2GB","Total Swap":"1GB","Used Swap":"0GB"}"#;

/// What the fake server answers.
#[derive(Clone)]
pub struct Script {
    pub snapshot: (StatusCode, String),
    /// Served from the second `/api/all` request on, when set.
    pub later_snapshot: Option<(StatusCode, String)>,
    /// When set, both action endpoints answer this regardless of the key.
    pub action_override: Option<(StatusCode, String)>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            snapshot: (StatusCode::OK, SAMPLE.to_string()),
            later_snapshot: None,
            action_override: None,
        }
    }
}

#[derive(Default)]
pub struct Hits {
    pub snapshot: AtomicUsize,
    pub shutdown: AtomicUsize,
    pub update: AtomicUsize,
    pub last_key: Mutex<Option<String>>,
}

impl Hits {
    pub fn actions(&self) -> usize {
        self.shutdown.load(Ordering::SeqCst) + self.update.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct ServerState {
    script: Script,
    hits: Arc<Hits>,
}

pub struct MockApi {
    pub base: String,
    pub hits: Arc<Hits>,
}

pub async fn spawn_api(script: Script) -> MockApi {
    let hits = Arc::new(Hits::default());
    let state = ServerState {
        script,
        hits: hits.clone(),
    };
    let app = Router::new()
        .route("/api/all", get(all))
        .route("/api/shutdown", post(shutdown))
        .route("/api/update", post(update))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    MockApi {
        base: format!("http://{addr}"),
        hits,
    }
}

/// An address nothing listens on.
pub fn dead_address() -> String {
    let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr: SocketAddr = l.local_addr().unwrap();
    drop(l);
    format!("http://{addr}")
}

fn json(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn all(State(st): State<ServerState>) -> Response {
    let n = st.hits.snapshot.fetch_add(1, Ordering::SeqCst);
    let (status, body) = match (&st.script.later_snapshot, n) {
        (Some(later), n) if n > 0 => later.clone(),
        _ => st.script.snapshot.clone(),
    };
    json(status, body)
}

fn privileged(st: &ServerState, headers: &HeaderMap, message: &str) -> Response {
    let key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *st.hits.last_key.lock().unwrap() = key.clone();
    if let Some((status, body)) = st.script.action_override.clone() {
        return json(status, body);
    }
    if key.as_deref() == Some(API_KEY) {
        json(StatusCode::OK, format!(r#"{{"message":"{message}"}}"#))
    } else {
        json(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"Unauthorized"}"#.to_string(),
        )
    }
}

async fn shutdown(State(st): State<ServerState>, headers: HeaderMap) -> Response {
    st.hits.shutdown.fetch_add(1, Ordering::SeqCst);
    privileged(&st, &headers, "System shutting down in 1 minute")
}

async fn update(State(st): State<ServerState>, headers: HeaderMap) -> Response {
    st.hits.update.fetch_add(1, Ordering::SeqCst);
    privileged(&st, &headers, "System update complete!")
}

/// Answers prompts from a script and records everything it was shown.
#[derive(Default)]
pub struct Scripted {
    pub key: Option<String>,
    pub confirm: bool,
    pub prompts: Vec<String>,
    pub confirms: Vec<String>,
    pub notices: Vec<String>,
}

impl Scripted {
    pub fn answering(key: Option<&str>, confirm: bool) -> Self {
        Self {
            key: key.map(str::to_string),
            confirm,
            ..Default::default()
        }
    }
}

impl Interaction for Scripted {
    fn prompt(&mut self, message: &str) -> Option<String> {
        self.prompts.push(message.to_string());
        self.key.clone()
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.confirm
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
