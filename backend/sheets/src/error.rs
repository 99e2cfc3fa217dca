use reqwest::StatusCode;
use thiserror::Error;

/// Every way a fetch can fail. The HTTP surface collapses these into one 500,
/// but callers that care can still tell them apart.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    #[error("Transport failure: {0}")]
    TransportFailure(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::AuthFailure(_) => "auth",
            FetchError::TransportFailure(_) => "transport",
            FetchError::MalformedResponse(_) => "malformed_response",
        }
    }

    pub(crate) fn unexpected_status(endpoint: &str, status: StatusCode, body: &str) -> Self {
        FetchError::MalformedResponse(format!("{endpoint} returned {status}: {}", body.trim()))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            FetchError::MalformedResponse(error.to_string())
        } else {
            FetchError::TransportFailure(error.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Service account JSON is invalid: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Failed to read service account file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("Service account private key is invalid: {0}")]
    InvalidKey(String),
}
