use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{Authenticator, AuthError};

/// Short-lived session credential, never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    value: String,
    pub obtained_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(value: String, obtained_at: DateTime<Utc>) -> Self {
        Self { value, obtained_at }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.obtained_at
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &"<redacted>")
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

/// Owner of the current session token.
///
/// The token lock is held across a login, so callers arriving while a login
/// is in flight wait for its result instead of starting their own. A failed
/// login is remembered until [`SessionManager::begin_cycle`], so the router
/// sees at most one refused login per collection cycle.
pub struct SessionManager {
    authenticator: Authenticator,
    state: Mutex<SessionState>,
}

#[derive(Default)]
struct SessionState {
    token: Option<SessionToken>,
    /// Reason of the last failed login, replayed until the next cycle
    failed_login: Option<String>,
}

impl SessionManager {
    pub fn new(authenticator: Authenticator) -> Self {
        Self {
            authenticator,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Return the current token, logging in first if there is none.
    pub async fn valid_token(&self) -> Result<SessionToken, AuthError> {
        let mut state = self.state.lock().await;
        if let Some(ref token) = state.token {
            return Ok(token.clone());
        }
        if let Some(ref reason) = state.failed_login {
            debug!(reason = %reason, "Login already failed this cycle, not retrying");
            return Err(AuthError::LoginPaused(reason.clone()));
        }

        match self.authenticator.login().await {
            Ok(token) => {
                info!("Logged in to the router");
                state.token = Some(token.clone());
                Ok(token)
            }
            Err(e) => {
                warn!(error = %e, "Login to the router failed");
                state.failed_login = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Start a new collection cycle: a login refused earlier may be tried again.
    pub async fn begin_cycle(&self) {
        self.state.lock().await.failed_login = None;
    }

    /// Drop `stale` if it is still the current token.
    ///
    /// A token already replaced by a newer login is left alone, so several
    /// callers failing with the same token cause a single re-login.
    pub async fn invalidate(&self, stale: &SessionToken) {
        let mut state = self.state.lock().await;
        if state.token.as_ref() == Some(stale) {
            debug!(age_secs = stale.age().num_seconds(), "Session token invalidated");
            state.token = None;
        }
    }

    pub async fn has_token(&self) -> bool {
        self.state.lock().await.token.is_some()
    }
}
