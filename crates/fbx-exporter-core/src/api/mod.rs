//! Router API access.
//!
//! - `RouterClient`: raw HTTP against the router, envelope decoding
//! - `RequestExecutor`: authenticated calls with a single re-login retry
//!
//! Every authenticated call carries the session token in `X-Fbx-App-Auth`.

pub mod client;
pub mod error;
pub mod executor;

pub use client::{ApiRequest, RawResponse, RouterClient, AUTH_HEADER};
pub use error::ApiError;
pub use executor::{is_session_expired, RequestExecutor, SessionExpiryPredicate};
