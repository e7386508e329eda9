#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {path} timed out")]
    Timeout { path: String },

    #[error("Device answered {path} with HTTP {status}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
    },

    #[error("Device reply to {path} is not valid JSON: {message}")]
    Decode { path: String, message: String },

    #[error("Invalid device endpoint: {0}")]
    Endpoint(String),
}

impl TransportError {
    pub fn from_reqwest(path: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                path: path.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                path: path.to_string(),
                message: err.to_string(),
            }
        } else {
            TransportError::Request {
                path: path.to_string(),
                source: err,
            }
        }
    }
}
