//! Authentication against the router.
//!
//! This module provides:
//! - `CredentialStore`: the application token file, written once at registration
//! - `Registrar`: the app authorization handshake, resumed after a restart
//! - `Authenticator`: challenge-response login producing a session token
//! - `SessionManager`: owns the current session token, re-logs in on demand
//!
//! The application token never leaves the process: each login signs a fresh
//! router challenge with it (HMAC-SHA1) instead.

pub mod authenticator;
pub mod challenge;
pub mod credentials;
pub mod error;
pub mod registration;
pub mod session;

pub use authenticator::Authenticator;
pub use challenge::{sign, Challenge};
pub use credentials::{ApplicationCredential, CredentialStore};
pub use error::AuthError;
pub use registration::{ApprovalPolicy, Registrar, RegistrationState};
pub use session::{SessionManager, SessionToken};
