use serde::Deserialize;

/// Envelope wrapping every router API answer.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub result: Option<T>,
    pub error_code: Option<String>,
    pub msg: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn error_code(&self) -> &str {
        self.error_code.as_deref().unwrap_or("")
    }

    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or("")
    }
}
