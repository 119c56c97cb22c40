use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authorization denied on the router")]
    Denied,

    #[error("Authorization not granted after {attempts} polls")]
    ApprovalTimeout { attempts: u32 },

    #[error("Login rejected: {0}")]
    LoginRejected(String),

    #[error("Login already failed this cycle: {0}")]
    LoginPaused(String),

    #[error("Router API error: {0}")]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
