use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::RouterClient;
use crate::models::{AppIdentity, AuthorizationStatus};

use super::{ApplicationCredential, AuthError, CredentialStore};

/// Delay between two authorization status polls.
const APPROVAL_POLL_INTERVAL_SECS: u64 = 2;

/// Polls before giving up on the user, two minutes at the default interval.
const APPROVAL_MAX_ATTEMPTS: u32 = 60;

/// Steps of the one-time registration handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    AuthorizationRequested,
    PendingUserApproval,
    Granted,
    Denied,
    Timeout,
}

#[derive(Debug, Clone, Copy)]
pub struct ApprovalPolicy {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(APPROVAL_POLL_INTERVAL_SECS),
            max_attempts: APPROVAL_MAX_ATTEMPTS,
        }
    }
}

/// Registers the exporter on the router and persists the credential.
pub struct Registrar<'a> {
    client: &'a RouterClient,
    store: &'a CredentialStore,
    policy: ApprovalPolicy,
    state: RegistrationState,
    history: Vec<RegistrationState>,
}

impl<'a> Registrar<'a> {
    pub fn new(client: &'a RouterClient, store: &'a CredentialStore, policy: ApprovalPolicy) -> Self {
        Self {
            client,
            store,
            policy,
            state: RegistrationState::Unregistered,
            history: vec![RegistrationState::Unregistered],
        }
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    /// Every state visited so far, in order
    pub fn history(&self) -> &[RegistrationState] {
        &self.history
    }

    /// Return the stored credential, registering first if there is none.
    ///
    /// A stored credential may predate its approval, so its status is
    /// checked and a pending request is waited on like a fresh one.
    pub async fn load_or_register(&mut self, identity: AppIdentity) -> Result<ApplicationCredential, AuthError> {
        if let Some(credential) = self.store.load()? {
            debug!(path = %self.store.path().display(), track_id = credential.track_id, "Application token loaded");
            return self.await_approval(credential).await;
        }
        self.register(identity).await
    }

    /// Request an application token and wait for the user to approve it.
    ///
    /// The token is saved as soon as the router issues it, before approval.
    pub async fn register(&mut self, identity: AppIdentity) -> Result<ApplicationCredential, AuthError> {
        let authorization = self.client.request_authorization(&identity).await?;
        let credential = ApplicationCredential::new(identity, authorization.app_token, authorization.track_id);
        self.store.save(&credential)?;
        self.advance(RegistrationState::AuthorizationRequested);

        info!(
            track_id = credential.track_id,
            "Authorization requested, approve it on the router's front panel"
        );
        self.advance(RegistrationState::PendingUserApproval);
        self.await_approval(credential).await
    }

    /// Poll the authorization status of `credential` until the router settles.
    ///
    /// A refused or expired request drops the token file so the next start
    /// registers again. Running out of polls keeps it: the request may
    /// still be approved later.
    async fn await_approval(&mut self, credential: ApplicationCredential) -> Result<ApplicationCredential, AuthError> {
        for attempt in 1..=self.policy.max_attempts {
            let status = self.client.authorization_status(credential.track_id).await?;
            debug!(attempt, status = ?status.status, "Authorization status");

            match status.status {
                AuthorizationStatus::Pending => {
                    if self.state != RegistrationState::PendingUserApproval {
                        info!(
                            track_id = credential.track_id,
                            "Authorization still pending, approve it on the router's front panel"
                        );
                        self.advance(RegistrationState::PendingUserApproval);
                    }
                    tokio::time::sleep(self.policy.poll_interval).await;
                }
                AuthorizationStatus::Granted => {
                    self.advance(RegistrationState::Granted);
                    info!("Authorization granted");
                    return Ok(credential);
                }
                AuthorizationStatus::Timeout => {
                    self.advance(RegistrationState::Timeout);
                    warn!("Router gave up waiting for approval");
                    self.discard();
                    return Err(AuthError::ApprovalTimeout { attempts: attempt });
                }
                AuthorizationStatus::Denied | AuthorizationStatus::Unknown => {
                    self.advance(RegistrationState::Denied);
                    warn!(status = ?status.status, "Authorization refused");
                    self.discard();
                    return Err(AuthError::Denied);
                }
            }
        }

        self.advance(RegistrationState::Timeout);
        Err(AuthError::ApprovalTimeout {
            attempts: self.policy.max_attempts,
        })
    }

    fn discard(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Could not remove the unusable token file");
        }
    }

    fn advance(&mut self, next: RegistrationState) {
        debug!(from = ?self.state, to = ?next, "Registration state");
        self.state = next;
        self.history.push(next);
    }
}
