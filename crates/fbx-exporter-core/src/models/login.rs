use serde::{Deserialize, Serialize};

/// Identity the exporter registers itself under on the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentity {
    pub app_id: String,
    pub app_name: String,
    pub app_version: String,
    pub device_name: String,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            app_id: "fr.freebox.exporter".to_string(),
            app_name: "prometheus-exporter".to_string(),
            app_version: "0.4".to_string(),
            device_name: "local".to_string(),
        }
    }
}

/// Answer of `GET login/`
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeResult {
    #[serde(default)]
    pub logged_in: bool,
    pub challenge: String,
    pub password_salt: Option<String>,
}

/// Answer of `POST login/authorize/`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeResult {
    pub app_token: String,
    pub track_id: i64,
}

/// Answer of `GET login/authorize/{track_id}`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeStatusResult {
    pub status: AuthorizationStatus,
    pub challenge: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationStatus {
    /// The app token is invalid or has been revoked
    Unknown,
    /// The user has not confirmed the request on the router yet
    Pending,
    /// The user did not confirm before the router gave up
    Timeout,
    Granted,
    Denied,
}

/// Body of `POST login/session/`
#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest<'a> {
    pub app_id: &'a str,
    pub password: &'a str,
}

/// Answer of `POST login/session/`
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResult {
    pub session_token: String,
    pub challenge: Option<String>,
    #[serde(default)]
    pub permissions: serde_json::Value,
}
