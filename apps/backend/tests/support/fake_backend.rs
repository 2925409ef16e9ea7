//! A real HTTP server standing in for the hotel-management API.
//!
//! Bound to `127.0.0.1:0`, answers from a table of canned responses and
//! records every request so tests can assert what the gateway forwarded,
//! or that it forwarded nothing at all.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::header;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RecordedCall {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    body: Value,
    delay: Duration,
}

#[derive(Default)]
struct FakeState {
    routes: Mutex<HashMap<(String, String), Canned>>,
    calls: Mutex<Vec<RecordedCall>>,
}

pub struct FakeBackend {
    pub base_url: String,
    state: Arc<FakeState>,
    handle: ServerHandle,
}

async fn answer(req: HttpRequest, body: Bytes, state: web::Data<FakeState>) -> HttpResponse {
    let header_value = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.calls.lock().push(RecordedCall {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    });

    let canned = state
        .routes
        .lock()
        .get(&(req.method().to_string(), req.path().to_string()))
        .cloned();
    match canned {
        Some(canned) => {
            if !canned.delay.is_zero() {
                tokio::time::sleep(canned.delay).await;
            }
            let status = actix_web::http::StatusCode::from_u16(canned.status)
                .expect("canned status should be valid");
            HttpResponse::build(status).json(canned.body)
        }
        None => HttpResponse::NotFound().json(json!({ "message": "no such route" })),
    }
}

impl FakeBackend {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        let state = Arc::new(FakeState::default());
        let data = web::Data::from(Arc::clone(&state));

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .default_service(web::to(answer))
        })
        .workers(1)
        .disable_signals()
        .listen(listener)
        .expect("listen on fake backend socket")
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    /// Answer `method path` with `status` and a JSON body.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.respond_after(method, path, status, body, Duration::ZERO)
    }

    /// Like [`FakeBackend::respond`], but only after `delay`.
    pub fn respond_after(
        &self,
        method: &str,
        path: &str,
        status: u16,
        body: Value,
        delay: Duration,
    ) -> &Self {
        self.state.routes.lock().insert(
            (method.to_string(), path.to_string()),
            Canned { status, body, delay },
        );
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.lock().len()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// A base URL nothing listens on: bind a port, then release it.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe socket");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}
