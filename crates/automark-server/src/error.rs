use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Request-level failures. Scoring never fails; these come from the
/// session gate and the unlock form.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No valid session cookie.
    #[error("locked")]
    Locked,

    /// Unlock request without a code.
    #[error("missing_code")]
    MissingCode,

    /// Unlock request with the wrong code.
    #[error("incorrect_code")]
    IncorrectCode,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Locked | Self::IncorrectCode => StatusCode::UNAUTHORIZED,
            Self::MissingCode => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "ok": false, "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
