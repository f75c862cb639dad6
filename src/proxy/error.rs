use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failure talking to a third-party API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned invalid JSON: {message}")]
    Decode { url: String, message: String },
}

/// An upstream payload that does not have the shape we rely on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unexpected upstream payload: {0}")]
pub struct SchemaError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{error}: {detail}")]
    Upstream { error: String, detail: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProxyResult<T> = Result<T, ProxyError>;

impl ProxyError {
    pub fn upstream(error: &str, source: &UpstreamError) -> Self {
        ProxyError::Upstream {
            error: error.to_string(),
            detail: source.to_string(),
        }
    }
}

impl From<anyhow::Error> for ProxyError {
    fn from(err: anyhow::Error) -> Self {
        ProxyError::Internal(format!("{:#}", err))
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ProxyError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": msg, "code": "BAD_REQUEST" }),
            ),
            ProxyError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "error": msg, "code": "NOT_FOUND" }),
            ),
            ProxyError::Upstream { error, detail } => {
                log::warn!("Upstream failure: {}: {}", error, detail);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": error, "detail": detail, "code": "UPSTREAM_ERROR" }),
                )
            }
            ProxyError::Schema(err) => {
                log::warn!("{}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Malformed upstream payload", "detail": err.0, "code": "UPSTREAM_SCHEMA" }),
                )
            }
            ProxyError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal error occurred", "code": "INTERNAL_ERROR" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
