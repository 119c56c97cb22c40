use chrono::Utc;
use tracing::debug;

use crate::api::{ApiError, RouterClient};

use super::{ApplicationCredential, AuthError, Challenge, SessionToken};

/// Challenge-response login with a registered application credential.
pub struct Authenticator {
    client: RouterClient,
    credential: ApplicationCredential,
}

impl Authenticator {
    pub fn new(client: RouterClient, credential: ApplicationCredential) -> Self {
        Self { client, credential }
    }

    pub fn credential(&self) -> &ApplicationCredential {
        &self.credential
    }

    /// Open a new session: fetch a challenge, sign it, trade it for a token.
    pub async fn login(&self) -> Result<SessionToken, AuthError> {
        let challenge: Challenge = self.client.fetch_challenge().await?.into();
        debug!("Login challenge received");

        let password = challenge.into_password(&self.credential.app_token);

        let session = match self.client.open_session(&self.credential.app_id, &password).await {
            Ok(session) => session,
            Err(ApiError::Rejected { code, msg }) => {
                return Err(AuthError::LoginRejected(format!("{}: {}", code, msg)));
            }
            Err(ApiError::Unauthorized) => {
                return Err(AuthError::LoginRejected("session endpoint refused the app".to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        debug!(app_id = %self.credential.app_id, "Session opened");

        Ok(SessionToken::new(session.session_token, Utc::now()))
    }
}
