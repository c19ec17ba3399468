//! Shared helpers for monitor integration tests.
//!
//! Spins up an in-process mock of the prediction service on an ephemeral
//! port. The mock answers every `POST /predict_batch` with a canned status
//! and body, counts hits, and keeps the last request body.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use rulwatch_core::machine::fallback_machines;
use rulwatch_monitor::client::PredictionApi;
use rulwatch_monitor::store::MachineStore;

pub struct MockService {
    status: StatusCode,
    body: String,
    hits: AtomicUsize,
    last_request: Mutex<Option<Value>>,
}

impl MockService {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.last_request.lock().unwrap().clone()
    }
}

async fn predict_batch(
    State(mock): State<Arc<MockService>>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    *mock.last_request.lock().unwrap() = Some(body);
    (mock.status, mock.body.clone())
}

/// Start a mock service and return the full endpoint URL plus its handle.
pub async fn spawn_mock(status: StatusCode, body: &str) -> (String, Arc<MockService>) {
    let mock = Arc::new(MockService {
        status,
        body: body.to_string(),
        hits: AtomicUsize::new(0),
        last_request: Mutex::new(None),
    });

    let app = Router::new()
        .route("/predict_batch", post(predict_batch))
        .with_state(Arc::clone(&mock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/predict_batch"), mock)
}

pub fn api_for(url: &str) -> PredictionApi {
    PredictionApi::new(url.to_string(), Duration::from_secs(2)).unwrap()
}

pub fn default_store() -> Arc<MachineStore> {
    Arc::new(MachineStore::new(fallback_machines()).unwrap())
}
