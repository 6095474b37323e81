use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::STRATEGY_HEADER;
use crate::history::HistoryError;
use crate::llm::ChatBackendError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transcript store error: {0}")]
    HistoryFailed(HistoryError),

    #[error("model backend error: {0}")]
    ProviderError(#[from] ChatBackendError),
}

impl From<HistoryError> for GatewayError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::InvalidSessionId { id } => {
                GatewayError::InvalidRequest(format!("invalid session id: {id}"))
            }
            other => GatewayError::HistoryFailed(other),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::HistoryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::ProviderError(_) => StatusCode::BAD_GATEWAY,
        };

        let mut headers = HeaderMap::new();
        headers.insert(STRATEGY_HEADER, HeaderValue::from_static("ERROR"));

        let body = ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        };

        (status, headers, Json(body)).into_response()
    }
}
