//! HTTP mapping for service errors
//!
//! Wrong-data errors become a 422 with the full list of field triples in
//! the `detail` array; the client renders them as per-field highlighting.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use staffrec_common::api::types::WrongDataBody;
use staffrec_common::Error;

/// Service error carried through axum handlers
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::WrongData(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(WrongDataBody { detail }),
            )
                .into_response(),
            Error::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            Error::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            Error::UnknownCurrency(code) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": format!("unknown currency: {}", code) })),
            )
                .into_response(),
            Error::ExchangeRateFormat(msg) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": msg }))).into_response()
            }
            other => {
                error!("internal error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
