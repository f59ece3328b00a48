//! Engine error -> HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use sealbid_types::SealbidError;

/// Wrapper so engine errors can be returned straight from handlers.
pub struct ApiError(pub SealbidError);

impl From<SealbidError> for ApiError {
    fn from(err: SealbidError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            SealbidError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing message. Transient failures say so; terminal ones
    /// ("not found", garbage plaintext) do not invite a retry.
    fn message(&self) -> String {
        match &self.0 {
            SealbidError::SessionNotFound(_) => "Trade session not found.".into(),
            SealbidError::Encryption { .. } => "Encryption failed. Try again.".into(),
            SealbidError::Decryption { .. } => "Decryption failed. Try again.".into(),
            SealbidError::UnparseablePrice { .. } => "Decryption failed.".into(),
            SealbidError::Storage(_) => "Database error. Try again.".into(),
            SealbidError::Internal(_) => "Internal error.".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self.0, "request failed");
        let body = json!({
            "success": false,
            "message": self.message(),
        });
        (self.status(), Json(body)).into_response()
    }
}
