//! In-process stand-in for the router's login and system API.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use fbx_exporter_core::api::{RouterClient, AUTH_HEADER};
use fbx_exporter_core::auth::{sign, ApplicationCredential};
use fbx_exporter_core::config::ApiEndpoints;
use fbx_exporter_core::models::AppIdentity;

pub const APP_TOKEN: &str = "dyNYgfK0Ya6FWGqq83sBHa7TwzWo";
pub const TRACK_ID: i64 = 42;

#[derive(Default)]
pub struct FakeState {
    pub challenges: AtomicUsize,
    pub logins: AtomicUsize,
    pub data_requests: AtomicUsize,
    pub status_polls: AtomicUsize,
    /// Polls answered "pending" before `final_status`
    pub pending_polls: AtomicUsize,
    pub final_status: Mutex<String>,
    /// Every session token is refused by the data endpoints
    pub reject_sessions: AtomicBool,
    pub login_delay: Mutex<Duration>,
    challenge: Mutex<String>,
    valid_session: Mutex<Option<String>>,
}

impl FakeState {
    /// Forget the current session, as the router does after its idle timeout
    pub fn expire_session(&self) {
        *self.valid_session.lock().unwrap() = None;
    }

    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn data_requests(&self) -> usize {
        self.data_requests.load(Ordering::SeqCst)
    }
}

pub struct FakeRouter {
    pub state: Arc<FakeState>,
    pub base_url: String,
}

impl FakeRouter {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        *state.final_status.lock().unwrap() = "granted".to_string();

        let app = Router::new()
            .route("/api/v4/login/", get(challenge))
            .route("/api/v4/login/session/", post(open_session))
            .route("/api/v4/login/authorize/", post(authorize))
            .route("/api/v4/login/authorize/:track_id", get(authorize_status))
            .route("/api/v4/system/", get(system))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{}", addr),
        }
    }

    pub fn client(&self) -> RouterClient {
        RouterClient::new(ApiEndpoints::from_base(&self.base_url)).unwrap()
    }

    pub fn credential(&self) -> ApplicationCredential {
        ApplicationCredential::new(AppIdentity::default(), APP_TOKEN.to_string(), TRACK_ID)
    }
}

fn failure(status: StatusCode, code: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({"success": false, "error_code": code, "msg": code})))
}

async fn challenge(State(state): State<Arc<FakeState>>) -> Json<Value> {
    let n = state.challenges.fetch_add(1, Ordering::SeqCst) + 1;
    let challenge = format!("challenge-{}", n);
    *state.challenge.lock().unwrap() = challenge.clone();
    Json(json!({"success": true, "result": {"logged_in": false, "challenge": challenge}}))
}

#[derive(Deserialize)]
struct SessionBody {
    app_id: String,
    password: String,
}

async fn open_session(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<SessionBody>,
) -> (StatusCode, Json<Value>) {
    let expected = sign(&state.challenge.lock().unwrap(), APP_TOKEN);
    if body.app_id != AppIdentity::default().app_id || body.password != expected {
        return failure(StatusCode::FORBIDDEN, "invalid_token");
    }

    let delay = *state.login_delay.lock().unwrap();
    tokio::time::sleep(delay).await;

    let n = state.logins.fetch_add(1, Ordering::SeqCst) + 1;
    let token = format!("session-{}", n);
    *state.valid_session.lock().unwrap() = Some(token.clone());
    (
        StatusCode::OK,
        Json(json!({"success": true, "result": {"session_token": token, "challenge": "next", "permissions": {"settings": false}}})),
    )
}

async fn authorize() -> Json<Value> {
    Json(json!({"success": true, "result": {"app_token": APP_TOKEN, "track_id": TRACK_ID}}))
}

async fn authorize_status(
    State(state): State<Arc<FakeState>>,
    Path(track_id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    if track_id != TRACK_ID {
        return failure(StatusCode::NOT_FOUND, "noent");
    }
    let polls = state.status_polls.fetch_add(1, Ordering::SeqCst);
    let status = if polls < state.pending_polls.load(Ordering::SeqCst) {
        "pending".to_string()
    } else {
        state.final_status.lock().unwrap().clone()
    };
    (StatusCode::OK, Json(json!({"success": true, "result": {"status": status, "challenge": "c"}})))
}

async fn system(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    state.data_requests.fetch_add(1, Ordering::SeqCst);

    let presented = headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok()).map(str::to_string);
    let accepted = !state.reject_sessions.load(Ordering::SeqCst)
        && presented.is_some()
        && presented == *state.valid_session.lock().unwrap();
    if !accepted {
        return failure(StatusCode::FORBIDDEN, "auth_required");
    }
    (
        StatusCode::OK,
        Json(json!({"success": true, "result": {"temp_cpub": 61, "temp_cpum": 55, "temp_hdd": 40, "temp_sw": 48, "fan_rpm": 2003}})),
    )
}
