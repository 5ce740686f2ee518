use thiserror::Error;

/// Errors surfaced by the backend API client.
///
/// `NotFound` is kept separate so callers can treat a missing aggregate
/// differently from a failing server; everything else collapses into
/// `Server` with the best message we could extract from the response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("{message}")]
    Server { message: String },
}

impl ApiError {
    pub fn server(message: impl Into<String>) -> Self {
        ApiError::Server {
            message: message.into(),
        }
    }

    /// Build an error from a non-success HTTP response.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if status == reqwest::StatusCode::NOT_FOUND {
            ApiError::NotFound
        } else {
            ApiError::Server {
                message: extract_message(status, body),
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Server {
            message: err.to_string(),
        }
    }
}

/// Pick the most useful message out of an error body: the `message` field
/// of a JSON payload, else the raw body, else just the status line.
fn extract_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}
