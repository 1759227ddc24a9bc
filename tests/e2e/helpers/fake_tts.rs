use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

/// A request seen by the fake TTS server
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub endpoint: String,
    pub body: Value,
}

#[derive(Default)]
struct FakeTtsState {
    seen: Mutex<Vec<SeenRequest>>,
    primary_down: AtomicBool,
}

/// Local TTS service with `/primary` and `/fallback` endpoints.
///
/// Answers with the text wrapped in brackets so merged output reveals the
/// segment order. Text containing `FAIL` is always rejected with 500.
pub struct FakeTtsServer {
    base_url: String,
    state: Arc<FakeTtsState>,
}

impl FakeTtsServer {
    pub async fn start() -> Self {
        let state = Arc::new(FakeTtsState::default());
        let app = Router::new()
            .route("/:endpoint", post(synthesize))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake TTS listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn primary_url(&self) -> String {
        format!("{}/primary", self.base_url)
    }

    pub fn fallback_url(&self) -> String {
        format!("{}/fallback", self.base_url)
    }

    /// Make the primary endpoint answer 503 to everything
    pub fn take_primary_down(&self) {
        self.state.primary_down.store(true, Ordering::SeqCst);
    }

    pub fn requests_to(&self, endpoint: &str) -> Vec<SeenRequest> {
        self.state
            .seen
            .lock()
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .cloned()
            .collect()
    }
}

async fn synthesize(
    State(state): State<Arc<FakeTtsState>>,
    Path(endpoint): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Vec<u8>) {
    state.seen.lock().push(SeenRequest {
        endpoint: endpoint.clone(),
        body: body.clone(),
    });

    if endpoint == "primary" && state.primary_down.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, b"unavailable".to_vec());
    }

    let text = body
        .get("text")
        .or_else(|| body.get("input"))
        .and_then(|t| t.as_str())
        .unwrap_or_default();
    if text.contains("FAIL") {
        return (StatusCode::INTERNAL_SERVER_ERROR, b"synthesis failed".to_vec());
    }

    (StatusCode::OK, format!("[{}]", text).into_bytes())
}
