//! Recording registry server for client and lifecycle tests

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

/// One request as seen by the test registry
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub body: String,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct ServerState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    respond_status: Arc<AtomicU16>,
    respond_body: Arc<Mutex<String>>,
}

/// In-process registry that records every request and answers with a
/// configurable status and body
pub struct TestRegistry {
    pub base_url: String,
    state: ServerState,
}

impl TestRegistry {
    /// Bind to an ephemeral port and start serving; answers 200 with an
    /// empty body until [`TestRegistry::set_response`] is called
    pub async fn spawn() -> Self {
        let state = ServerState {
            calls: Arc::new(Mutex::new(Vec::new())),
            respond_status: Arc::new(AtomicU16::new(200)),
            respond_body: Arc::new(Mutex::new(String::new())),
        };

        let router = Router::new().fallback(record).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test registry");
        let addr = listener.local_addr().expect("test registry addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test registry");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Change the status and body returned to subsequent requests
    pub fn set_response(&self, status: u16, body: &str) {
        self.state.respond_status.store(status, Ordering::SeqCst);
        *self.state.respond_body.lock().unwrap() = body.to_string();
    }

    /// Snapshot of every request received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    /// Number of recorded requests with the given method
    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.method == method).count()
    }
}

async fn record(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    state.calls.lock().unwrap().push(RecordedCall {
        method: method.to_string(),
        path: uri.path().to_string(),
        body: String::from_utf8_lossy(&body).into_owned(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    });

    let status = StatusCode::from_u16(state.respond_status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, state.respond_body.lock().unwrap().clone())
}
