use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why a finished session could not be delivered to the tracker.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("session endpoint unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("session endpoint answered {0}")]
    Status(reqwest::StatusCode),
    #[error("unreadable response from session endpoint: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("session was not accepted (status {0:?})")]
    Rejected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}
