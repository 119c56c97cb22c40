//! HTTP client for the router's local API.
//!
//! `RouterClient` knows the wire format (the `{success, result}` envelope,
//! the login endpoints) but nothing about sessions: every call takes the
//! session token it must carry, if any. Session handling lives in
//! [`crate::auth::SessionManager`] and [`super::RequestExecutor`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::ApiEndpoints;
use crate::models::{
    ApiResponse, AppIdentity, AuthorizeResult, AuthorizeStatusResult, ChallengeResult,
    SessionRequest, SessionResult,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Header carrying the session token on authenticated calls
pub const AUTH_HEADER: &str = "X-Fbx-App-Auth";

/// HTTP request timeout in seconds.
/// The router answers from the LAN, so anything slower than this is an outage.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// One call against a named router resource.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Header the session token is attached under
    pub auth_header: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            auth_header: AUTH_HEADER.to_string(),
            body: None,
        }
    }

    pub fn post<B: Serialize>(url: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode request body: {}", e)))?;
        Ok(Self {
            method: Method::POST,
            url: url.into(),
            auth_header: AUTH_HEADER.to_string(),
            body: Some(body),
        })
    }
}

/// Status and body of a router answer, before envelope decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    /// The envelope's `error_code`, if the body is an envelope carrying one.
    pub fn error_code(&self) -> Option<String> {
        serde_json::from_str::<ApiResponse<serde_json::Value>>(&self.body)
            .ok()
            .and_then(|env| env.error_code)
    }

    /// Decode the envelope and return its `result`.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let envelope: ApiResponse<T> = match serde_json::from_str(&self.body) {
            Ok(envelope) => envelope,
            Err(e) if self.status.is_success() => {
                return Err(ApiError::InvalidResponse(format!(
                    "Failed to parse response: {}: {}",
                    e,
                    ApiError::truncate_body(&self.body)
                )));
            }
            Err(_) => return Err(ApiError::from_status(self.status, &self.body)),
        };

        if !envelope.success {
            return Err(ApiError::Rejected {
                code: envelope.error_code().to_string(),
                msg: envelope.message().to_string(),
            });
        }
        envelope
            .result
            .ok_or_else(|| ApiError::InvalidResponse("Response has no result".to_string()))
    }
}

/// API client for the router.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct RouterClient {
    client: Client,
    endpoints: Arc<ApiEndpoints>,
}

impl RouterClient {
    pub fn new(endpoints: ApiEndpoints) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            endpoints: Arc::new(endpoints),
        })
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    /// Send a request, attaching `token` under the request's auth header.
    /// Only transport failures are errors here; HTTP and envelope errors are
    /// left in the returned response for the caller to inspect.
    pub async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<RawResponse, ApiError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        if let Some(token) = token {
            builder = builder.header(request.auth_header.as_str(), token);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(method = %request.method, url = %request.url, status = status.as_u16(), "Router answered");

        Ok(RawResponse { status, body })
    }

    // ===== Login endpoints =====

    /// Fetch a fresh login challenge
    pub async fn fetch_challenge(&self) -> Result<ChallengeResult, ApiError> {
        let request = ApiRequest::get(self.endpoints.login.as_str());
        self.send(&request, None).await?.into_result()
    }

    /// Ask the router to register this application
    pub async fn request_authorization(&self, identity: &AppIdentity) -> Result<AuthorizeResult, ApiError> {
        let request = ApiRequest::post(self.endpoints.authorize.as_str(), identity)?;
        self.send(&request, None).await?.into_result()
    }

    /// Poll the state of a pending registration
    pub async fn authorization_status(&self, track_id: i64) -> Result<AuthorizeStatusResult, ApiError> {
        let request = ApiRequest::get(self.endpoints.authorize_status(track_id));
        self.send(&request, None).await?.into_result()
    }

    /// Open a session with a signed challenge
    pub async fn open_session(&self, app_id: &str, password: &str) -> Result<SessionResult, ApiError> {
        let request = ApiRequest::post(
            self.endpoints.session.as_str(),
            &SessionRequest { app_id, password },
        )?;
        self.send(&request, None).await?.into_result()
    }
}
