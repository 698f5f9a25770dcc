use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the server saw of a request to `/echo`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hits {
    pub count: u64,
}

pub type Counter = Arc<AtomicU64>;

pub fn app() -> Router {
    let counter: Counter = Arc::new(AtomicU64::new(0));
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", get(status))
        .route("/slow/{ms}", get(slow))
        .route("/hits", get(hits))
        .with_state(counter)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    State(counter): State<Counter>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> (HeaderMap, Json<Echo>) {
    counter.fetch_add(1, Ordering::SeqCst);
    tracing::debug!(%method, "echo");

    let mut reply = HeaderMap::new();
    if let Ok(value) = method.as_str().parse() {
        reply.insert("x-echo-method", value);
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let echo = Echo {
        method: method.to_string(),
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    (reply, Json(echo))
}

async fn status(State(counter): State<Counter>, Path(code): Path<u16>) -> StatusCode {
    counter.fetch_add(1, Ordering::SeqCst);
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn slow(State(counter): State<Counter>, Path(ms): Path<u64>) -> &'static str {
    counter.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "done"
}

async fn hits(State(counter): State<Counter>) -> Json<Hits> {
    Json(Hits {
        count: counter.load(Ordering::SeqCst),
    })
}
