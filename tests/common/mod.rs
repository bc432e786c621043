//! Local mock of the calendar, weather and completion providers.
//!
//! One axum server on an ephemeral port serves all three APIs. Every request
//! is recorded so tests can assert on call counts, query strings, auth
//! headers and JSON bodies.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use office_assistant::config::Config;
use office_assistant::{Assistant, SessionContext};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

pub struct MockState {
    pub base_url: String,
    pub users_me_status: Mutex<u16>,
    pub events: Mutex<Vec<Value>>,
    pub invitees: Mutex<HashMap<String, Vec<Value>>>,
    /// Event uuids whose invitee lookup answers 500.
    pub failing_invitees: Mutex<HashSet<String>>,
    pub event_types: Mutex<Vec<Value>>,
    pub cancel_status: Mutex<u16>,
    pub cancel_body: Mutex<String>,
    pub weather: Mutex<Value>,
    pub completion: Mutex<String>,
    pub requests: Mutex<Vec<Recorded>>,
}

impl MockState {
    fn record(&self, method: &'static str, path: String, query: HashMap<String, String>, headers: &HeaderMap, body: Option<Value>) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(Recorded { method, path, query, authorization, body });
    }
}

pub struct MockProvider {
    pub state: Arc<MockState>,
}

impl MockProvider {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let state = Arc::new(MockState {
            base_url: base_url.clone(),
            users_me_status: Mutex::new(200),
            events: Mutex::new(Vec::new()),
            invitees: Mutex::new(HashMap::new()),
            failing_invitees: Mutex::new(HashSet::new()),
            event_types: Mutex::new(Vec::new()),
            cancel_status: Mutex::new(201),
            cancel_body: Mutex::new(String::new()),
            weather: Mutex::new(json!({
                "latitude": 40.71,
                "longitude": -74.01,
                "current_weather": { "temperature": 71.3, "windspeed": 8.9, "weathercode": 1 }
            })),
            completion: Mutex::new("Hello from the model".into()),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/users/me", get(users_me))
            .route("/scheduled_events", get(scheduled_events))
            .route("/scheduled_events/{uuid}/invitees", get(invitees))
            .route("/scheduled_events/{uuid}/cancellation", post(cancellation))
            .route("/event_types", get(event_types))
            .route("/v1/forecast", get(forecast))
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { state }
    }

    pub fn base_url(&self) -> &str {
        &self.state.base_url
    }

    pub fn config(&self) -> Config {
        Config::for_base_url(self.base_url())
    }

    /// Assistant wired to this mock, with the dummy LLM.
    pub fn assistant(&self) -> Assistant {
        Assistant::from_config(&self.config()).unwrap()
    }

    /// Assistant wired to this mock, with the OpenAI-compatible LLM.
    pub fn assistant_with_llm(&self) -> Assistant {
        let mut config = self.config();
        config.llm.provider = "openai".into();
        config.llm_api_key = Some("sk-test".into());
        Assistant::from_config(&config).unwrap()
    }

    pub fn event_uri(&self, uuid: &str) -> String {
        format!("{}/scheduled_events/{uuid}", self.base_url())
    }

    /// Add a scheduled event, optionally with one named invitee.
    pub fn add_event(&self, uuid: &str, name: Option<&str>, start_time: Option<&str>, invitee: Option<&str>) {
        let mut event = json!({ "uri": self.event_uri(uuid), "status": "active" });
        if let Some(name) = name {
            event["name"] = json!(name);
        }
        if let Some(start) = start_time {
            event["start_time"] = json!(start);
        }
        self.state.events.lock().unwrap().push(event);
        let list = invitee.map(|n| vec![json!({ "name": n, "email": "x@example.com" })]).unwrap_or_default();
        self.state.invitees.lock().unwrap().insert(uuid.to_string(), list);
    }

    pub fn fail_invitees_of(&self, uuid: &str) {
        self.state.failing_invitees.lock().unwrap().insert(uuid.to_string());
    }

    pub fn clear_events(&self) {
        self.state.events.lock().unwrap().clear();
        self.state.invitees.lock().unwrap().clear();
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path_prefix: &str) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| r.path.starts_with(path_prefix)).collect()
    }

    pub fn cancellations(&self) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| r.path.ends_with("/cancellation")).collect()
    }
}

pub fn new_session() -> SessionContext {
    SessionContext::new()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn users_me(State(s): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    s.record("GET", "/users/me".into(), HashMap::new(), &headers, None);
    let status = *s.users_me_status.lock().unwrap();
    if status != 200 {
        let code = StatusCode::from_u16(status).unwrap();
        return (code, r#"{"title":"Unauthenticated"}"#).into_response();
    }
    Json(json!({
        "resource": {
            "uri": format!("{}/users/ME", s.base_url),
            "name": "Test User",
            "current_organization": format!("{}/organizations/ORG", s.base_url)
        }
    }))
    .into_response()
}

async fn scheduled_events(
    State(s): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    s.record("GET", "/scheduled_events".into(), query, &headers, None);
    let events = s.events.lock().unwrap().clone();
    Json(json!({ "collection": events, "pagination": {} }))
}

async fn invitees(
    State(s): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(uuid): Path<String>,
) -> Response {
    s.record("GET", format!("/scheduled_events/{uuid}/invitees"), HashMap::new(), &headers, None);
    if s.failing_invitees.lock().unwrap().contains(&uuid) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "invitee service down").into_response();
    }
    let list = s.invitees.lock().unwrap().get(&uuid).cloned().unwrap_or_default();
    Json(json!({ "collection": list })).into_response()
}

async fn cancellation(
    State(s): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(uuid): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    s.record("POST", format!("/scheduled_events/{uuid}/cancellation"), HashMap::new(), &headers, Some(body));
    let status = StatusCode::from_u16(*s.cancel_status.lock().unwrap()).unwrap();
    if status == StatusCode::CREATED {
        (status, Json(json!({ "resource": { "canceler_type": "host" } }))).into_response()
    } else {
        (status, s.cancel_body.lock().unwrap().clone()).into_response()
    }
}

async fn event_types(
    State(s): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    s.record("GET", "/event_types".into(), query, &headers, None);
    let types = s.event_types.lock().unwrap().clone();
    Json(json!({ "collection": types }))
}

async fn forecast(
    State(s): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    s.record("GET", "/v1/forecast".into(), query, &headers, None);
    Json(s.weather.lock().unwrap().clone())
}

async fn chat_completions(
    State(s): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    s.record("POST", "/v1/chat/completions".into(), HashMap::new(), &headers, Some(body));
    let content = s.completion.lock().unwrap().clone();
    Json(json!({
        "id": "chatcmpl-test",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    }))
}
