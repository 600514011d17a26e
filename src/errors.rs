use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// Failures raised by the Black-Scholes engine.
/// Valid input never produces these; they guard against NaN/Infinity leaking
/// into the store when the volatility or maturity term degenerates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("domain error: {0}")]
    Domain(String),

    #[error("arithmetic error: {0}")]
    Arithmetic(String),
}

/// Request-level error taxonomy.
/// Every variant is terminal for the request that raised it.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("Black-Scholes calculation failed: {0}")]
    Pricing(#[from] PricingError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("Calculation not found")]
    NotFound,

    #[error("config error: {0}")]
    Config(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Pricing(_) | Self::Storage(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Storage(format!("store task failed: {e}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = match self {
            Self::NotFound => serde_json::json!({ "error": self.to_string() }),
            _ => serde_json::json!({ "error": self.to_string(), "status": "error" }),
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
