#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use http::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Local stand-in for the identity-graph `transitiveMemberOf` listing.
///
/// Page 0 is served at `/me/transitiveMemberOf`, page `n` at `/page/n`. Every successful
/// page except the last links to the next one through `@odata.nextLink`.
pub struct GraphStub {
    base_url: String,
    calls: Arc<AtomicUsize>,
    auth_headers: Arc<Mutex<Vec<String>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

#[derive(Clone)]
pub enum PageConfig {
    Groups(Vec<&'static str>),
    Status(StatusCode),
    Garbage,
}

struct StubState {
    base_url: String,
    pages: Vec<PageConfig>,
    calls: Arc<AtomicUsize>,
    auth_headers: Arc<Mutex<Vec<String>>>,
}

impl GraphStub {
    pub async fn start(pages: Vec<PageConfig>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind graph stub");
        let addr = listener.local_addr().expect("graph stub local addr");
        let base_url = format!("http://{}", addr);

        let calls = Arc::new(AtomicUsize::new(0));
        let auth_headers = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(StubState {
            base_url: base_url.clone(),
            pages,
            calls: calls.clone(),
            auth_headers: auth_headers.clone(),
        });

        let router = Router::new()
            .route("/me/transitiveMemberOf", get(first_page_handler))
            .route("/page/:n", get(page_handler))
            .with_state(state);

        let (tx, rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, router.into_make_service());
        tokio::spawn(async move {
            tokio::select! {
                res = server => {
                    if let Err(err) = res {
                        eprintln!("Graph stub server error: {err:?}");
                    }
                }
                _ = rx => {}
            }
        });

        GraphStub {
            base_url,
            calls,
            auth_headers,
            shutdown: Some(tx),
        }
    }

    /// URL of the first page.
    pub fn endpoint(&self) -> String {
        format!("{}/me/transitiveMemberOf?$select=id", self.base_url)
    }

    pub fn page_url(&self, n: usize) -> String {
        format!("{}/page/{}", self.base_url, n)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn auth_headers(&self) -> Vec<String> {
        self.auth_headers.lock().expect("lock auth headers").clone()
    }
}

impl Drop for GraphStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn first_page_handler(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    serve_page(&state, 0, &headers)
}

async fn page_handler(
    State(state): State<Arc<StubState>>,
    Path(n): Path<usize>,
    headers: HeaderMap,
) -> Response {
    serve_page(&state, n, &headers)
}

fn serve_page(state: &StubState, n: usize, headers: &HeaderMap) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    if let Some(auth) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Ok(mut guard) = state.auth_headers.lock() {
            guard.push(auth.to_string());
        }
    }

    match state.pages.get(n) {
        Some(PageConfig::Groups(ids)) => {
            let value: Vec<serde_json::Value> = ids
                .iter()
                .map(|id| serde_json::json!({"@odata.type": "#microsoft.graph.group", "id": id}))
                .collect();
            let mut body = serde_json::json!({ "value": value });
            if n + 1 < state.pages.len() {
                body["@odata.nextLink"] =
                    serde_json::Value::String(format!("{}/page/{}", state.base_url, n + 1));
            }
            Json(body).into_response()
        }
        Some(PageConfig::Status(status)) => (
            *status,
            Json(serde_json::json!({"error": {"code": "Authorization_RequestDenied"}})),
        )
            .into_response(),
        Some(PageConfig::Garbage) => (StatusCode::OK, "<html>not json</html>").into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
