#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;

use machineid_crew::config::{DEFAULT_DEVICE_ID, DEFAULT_LLM_BASE_URL, DEFAULT_MODEL};
use machineid_crew::crew::{CrewOutput, Kickoff, TaskOutput};
use machineid_crew::{Cli, Config, ValidateMethod};

pub const ORG_KEY: &str = "org_test_0123456789";

/// One request seen by the fake device API
#[derive(Debug, Clone)]
pub struct Hit {
    pub path: String,
    pub method: Method,
    pub query: Option<String>,
    pub org_key: Option<String>,
    pub body: String,
}

/// Canned reply: HTTP status, body
pub type Reply = (StatusCode, String);

#[derive(Clone)]
struct FakeState {
    register: Reply,
    validate: Reply,
    hits: Arc<Mutex<Vec<Hit>>>,
}

pub struct FakeMachineId {
    pub base_url: String,
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl FakeMachineId {
    pub async fn start(register: Reply, validate: Reply) -> Self {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            register,
            validate,
            hits: hits.clone(),
        };
        let app = Router::new()
            .route("/api/v1/devices/register", post(register_handler))
            .route(
                "/api/v1/devices/validate",
                get(validate_handler).post(validate_handler),
            )
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_on(&self, suffix: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|h| h.path.ends_with(suffix))
            .collect()
    }
}

pub fn json_reply(status: StatusCode, body: Value) -> Reply {
    (status, body.to_string())
}

fn record(state: &FakeState, method: Method, uri: &Uri, headers: &HeaderMap, body: String) {
    state.hits.lock().unwrap().push(Hit {
        path: uri.path().to_string(),
        method,
        query: uri.query().map(ToString::to_string),
        org_key: headers
            .get("x-org-key")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        body,
    });
}

async fn register_handler(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    record(&state, method, &uri, &headers, body);
    let (status, body) = state.register.clone();
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

async fn validate_handler(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    record(&state, method, &uri, &headers, body);
    let (status, body) = state.validate.clone();
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

pub fn config(base_url: &str, method: ValidateMethod) -> Config {
    let cli = Cli {
        base_url: base_url.to_string(),
        org_key: Some(ORG_KEY.to_string()),
        device_id: DEFAULT_DEVICE_ID.to_string(),
        validate_method: method,
        settle_ms: 0,
        timeout_secs: 5,
        model: DEFAULT_MODEL.to_string(),
        llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
        llm_api_key: None,
        llm_timeout_secs: 5,
        verbose: 0,
    };
    Config::from_cli(&cli).unwrap()
}

/// Crew stand-in that counts kickoffs
#[derive(Clone, Default)]
pub struct CountingCrew {
    pub kickoffs: Arc<AtomicUsize>,
    pub fail: bool,
}

impl CountingCrew {
    pub fn count(&self) -> usize {
        self.kickoffs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Kickoff for CountingCrew {
    async fn kickoff(&self) -> machineid_crew::Result<CrewOutput> {
        self.kickoffs.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(machineid_crew::Error::Llm("model unavailable".to_string()));
        }
        Ok(CrewOutput {
            raw: "1. Register\n2. Validate\n3. Stop".to_string(),
            tasks_output: vec![TaskOutput {
                agent: "CrewAI Worker".to_string(),
                description: "plan".to_string(),
                raw: "1. Register\n2. Validate\n3. Stop".to_string(),
            }],
        })
    }
}
