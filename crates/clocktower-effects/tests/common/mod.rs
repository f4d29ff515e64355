//! Local HTTP server standing in for Home Assistant and SmartThings.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

/// One request the server received.
#[derive(Debug, Clone)]
pub struct Call {
    pub path: String,
    pub auth: Option<String>,
    pub body: Value,
}

pub type Calls = Arc<Mutex<Vec<Call>>>;

fn record(calls: &Calls, uri: &Uri, headers: &HeaderMap, body: Value) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    calls.lock().unwrap().push(Call {
        path: uri.path().to_string(),
        auth,
        body,
    });
}

/// Device latency: `slow*` devices take 400ms, `fast*` answer at once,
/// everything else takes 200ms. Device `broken` fails with 500.
async fn device_command(
    State(calls): State<Calls>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let delay = if id.starts_with("slow") {
        400
    } else if id.starts_with("fast") {
        0
    } else {
        200
    };
    tokio::time::sleep(Duration::from_millis(delay)).await;
    record(&calls, &uri, &headers, body);

    if id == "broken" {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "device offline" })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "device": id })))
    }
}

async fn service_call(
    State(calls): State<Calls>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    record(&calls, &uri, &headers, body);
    Json(json!([]))
}

/// Start the server on its own thread and return its base URL.
pub fn spawn_server() -> (String, Calls) {
    let calls = Calls::default();
    let state = Arc::clone(&calls);
    let (tx, rx) = std::sync::mpsc::channel::<SocketAddr>();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let app = Router::new()
                .route("/devices/:id/commands", post(device_command))
                .route("/api/services/:domain/:service", post(service_call))
                .with_state(state);
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    let addr = rx.recv().unwrap();
    (format!("http://{}", addr), calls)
}
