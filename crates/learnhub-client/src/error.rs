use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with an error status and `{"error": message}`.
    #[error("{status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_show_status_and_message() {
        let err = ClientError::Api {
            status: 404,
            message: "Course not found".into(),
        };
        assert_eq!(err.to_string(), "404: Course not found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(ClientError::InvalidUrl("x".into()).status(), None);
    }
}
