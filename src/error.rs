use thiserror::Error;

/// Failures reported by the backend transport before any HTTP status is available.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never reached a server (connection refused, DNS failure, ...).
    #[error("no response from backend: {0}")]
    NoResponse(String),
    #[error("request to backend timed out: {0}")]
    Timeout(String),
    #[error("request to backend failed: {0}")]
    Request(String),
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Payment gateway is still loading, please wait a moment and try again")]
    GatewayNotReady,
    #[error("Payment gateway failed to load: {0}. Please reload the page")]
    GatewayLoadFailed(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Backend request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
    #[error("Payment widget error: {0}")]
    Widget(String),
    #[error("Payment succeeded at the gateway but verification failed: {detail}")]
    Unverified { detail: String },
    #[error("Cannot {action} while attempt is {from}")]
    InvalidTransition { from: String, action: &'static str },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
