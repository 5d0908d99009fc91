#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication expired")]
    AuthExpired,

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("credential store error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthExpired => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
