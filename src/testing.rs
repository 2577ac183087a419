//! In-process table-store stand-in for tests
//!
//! Serves canned JSON per (method, path) and records every request so tests
//! can assert on headers, query parameters and bodies.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::gateway::{Gateway, GatewayConfig};

pub const TEST_ANON_KEY: &str = "anon-key";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.as_str())
    }
}

#[derive(Default)]
struct MockState {
    routes: HashMap<(String, String), (u16, Value)>,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    /// Bind to an ephemeral port and start serving
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Answer `method path` with the given status and JSON body.
    /// A `Value::Null` body is sent as an empty response.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert((method.to_string(), path.to_string()), (status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }

    pub fn config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.base_url.clone(),
            anon_key: TEST_ANON_KEY.to_string(),
            request_timeout_ms: 5_000,
        }
    }

    pub fn gateway(&self) -> Gateway {
        Gateway::new(self.config()).unwrap()
    }
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let query = uri.query().map(url_pairs).unwrap_or_default();

    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers: headers
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect(),
        body: serde_json::from_slice(&body).ok(),
    };

    let mut state = state.lock().unwrap();
    let route = state
        .routes
        .get(&(recorded.method.clone(), recorded.path.clone()))
        .cloned();
    state.requests.push(recorded);

    match route {
        Some((status, Value::Null)) => StatusCode::from_u16(status).unwrap().into_response(),
        Some((status, body)) => (StatusCode::from_u16(status).unwrap(), Json(body)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "code": "PGRST205", "message": "no mock route" })),
        )
            .into_response(),
    }
}

fn url_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(k), decode(v))
        })
        .collect()
}

fn decode(s: &str) -> String {
    urlencoding::decode(&s.replace('+', " "))
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

// ============================================
// Row fixtures
// ============================================

pub fn order_json(id: &str, order_number: &str, status: &str) -> Value {
    json!({
        "id": id,
        "order_number": order_number,
        "customer_id": null,
        "customer_name": "张三",
        "customer_email": "zhang@example.com",
        "total_amount": 299.0,
        "items_count": 2,
        "status": status,
        "payment_status": "paid",
        "created_at": "2024-05-01T08:30:00+00:00",
        "updated_at": "2024-05-01T08:30:00+00:00"
    })
}

pub fn customer_json(id: &str, name: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", id),
        "phone": "13800000000",
        "location": "上海",
        "status": status,
        "avatar": "",
        "total_orders": 3,
        "total_spent": 1200.0,
        "created_at": "2024-04-01T00:00:00+00:00",
        "updated_at": "2024-04-01T00:00:00+00:00"
    })
}

pub fn product_json(id: &str, name: &str, category: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "price": 99.0,
        "category": category,
        "stock": 10,
        "status": "active",
        "image_url": "",
        "created_at": "2024-03-01T00:00:00+00:00",
        "updated_at": "2024-03-01T00:00:00+00:00"
    })
}
