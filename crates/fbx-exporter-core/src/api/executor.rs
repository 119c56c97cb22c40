use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::SessionManager;

use super::{ApiError, ApiRequest, RawResponse, RouterClient};

/// Envelope error codes meaning the session token is no longer accepted
pub const SESSION_EXPIRED_CODES: &[&str] = &["auth_required", "invalid_session"];

/// Decides whether a router answer means "log in again".
pub type SessionExpiryPredicate = fn(&RawResponse) -> bool;

pub fn is_session_expired(response: &RawResponse) -> bool {
    if response.status.as_u16() == 401 {
        return true;
    }
    response
        .error_code()
        .is_some_and(|code| SESSION_EXPIRED_CODES.contains(&code.as_str()))
}

/// Sends authenticated requests on behalf of the collectors.
#[derive(Clone)]
pub struct RequestExecutor {
    client: RouterClient,
    session: Arc<SessionManager>,
    is_expired: SessionExpiryPredicate,
}

impl RequestExecutor {
    pub fn new(client: RouterClient, session: Arc<SessionManager>) -> Self {
        Self {
            client,
            session,
            is_expired: is_session_expired,
        }
    }

    pub fn with_expiry_predicate(mut self, predicate: SessionExpiryPredicate) -> Self {
        self.is_expired = predicate;
        self
    }

    pub fn endpoints(&self) -> &crate::config::ApiEndpoints {
        self.client.endpoints()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Send `request` with the current session token.
    ///
    /// An expired session is renewed and the request sent again, once. A
    /// second rejection is returned as `ApiError::Unauthorized`. Transport
    /// errors are returned as they happen.
    pub async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let token = self.session.valid_token().await?;
        let response = self.client.send(request, Some(token.value())).await?;
        if !(self.is_expired)(&response) {
            return Ok(response);
        }

        debug!(url = %request.url, "Session expired, logging in again");
        self.session.invalidate(&token).await;

        let token = self.session.valid_token().await?;
        let response = self.client.send(request, Some(token.value())).await?;
        if (self.is_expired)(&response) {
            warn!(url = %request.url, "Session rejected right after login");
            self.session.invalidate(&token).await;
            return Err(ApiError::Unauthorized);
        }
        Ok(response)
    }

    /// Send `request` and decode the `result` of the router's answer.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        self.execute(request).await?.into_result()
    }
}
