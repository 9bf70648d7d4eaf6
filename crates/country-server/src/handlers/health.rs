use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: String,
    version: &'static str,
    environment: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: state.settings.app_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.settings.environment.clone(),
    })
}
