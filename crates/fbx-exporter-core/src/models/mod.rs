//! Data models for the router API.
//!
//! This module contains the payloads exchanged with the router:
//!
//! - `ApiResponse`: the `{success, result, error_code, msg}` envelope
//! - Login types: `ChallengeResult`, `AuthorizeResult`, `SessionResult`, ...
//! - Metric types: `RrdQuery`, `RrdResult`, `LanHost`, `SystemInfo`

pub mod envelope;
pub mod login;
pub mod router;

pub use envelope::ApiResponse;
pub use login::{
    AppIdentity, AuthorizationStatus, AuthorizeResult, AuthorizeStatusResult, ChallengeResult,
    SessionRequest, SessionResult,
};
pub use router::{LanHost, RrdQuery, RrdResult, SystemInfo};
