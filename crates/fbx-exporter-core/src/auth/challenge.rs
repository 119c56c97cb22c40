use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::models::ChallengeResult;

type HmacSha1 = Hmac<Sha1>;

/// Server nonce to be signed once with the application token.
#[derive(Debug)]
pub struct Challenge {
    value: String,
    pub password_salt: Option<String>,
}

impl Challenge {
    /// Consume the challenge, producing the login password.
    pub fn into_password(self, app_token: &str) -> String {
        sign(&self.value, app_token)
    }
}

impl From<ChallengeResult> for Challenge {
    fn from(result: ChallengeResult) -> Self {
        Self {
            value: result.challenge,
            password_salt: result.password_salt,
        }
    }
}

/// Lowercase hex HMAC-SHA1 of `challenge` keyed with `app_token`.
pub fn sign(challenge: &str, app_token: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(app_token.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(challenge.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
