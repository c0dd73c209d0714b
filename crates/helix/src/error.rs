use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HelixError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("{endpoint} returned {status}: {body}")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),
    #[error("no category matches '{0}'")]
    CategoryNotFound(String),
}

impl HelixError {
    /// True when the provider answered, but with a non-success status.
    pub fn is_status(&self) -> bool {
        matches!(self, HelixError::UnexpectedStatus { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HelixError::UnexpectedStatus { status, .. } => Some(*status),
            HelixError::Http(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_is_classified() {
        let err = HelixError::UnexpectedStatus {
            endpoint: "streams",
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "slow down".to_string(),
        };
        assert!(err.is_status());
        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(err.to_string(), "streams returned 429 Too Many Requests: slow down");
    }

    #[test]
    fn test_category_not_found_message() {
        let err = HelixError::CategoryNotFound("Just Chatting".to_string());
        assert!(!err.is_status());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("Just Chatting"));
    }
}
