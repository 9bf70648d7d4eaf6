//! Maps domain errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use country_core::CountryError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub CountryError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            CountryError::SourceUnavailable { provider, .. } => {
                tracing::warn!("Refresh failed: {}", self.0);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({
                        "error": "External data source unavailable",
                        "details": self.0.source_details(),
                        "source": provider,
                    }),
                )
            }
            CountryError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Country not found" }),
            ),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Internal server error",
                        "details": other.to_string(),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
