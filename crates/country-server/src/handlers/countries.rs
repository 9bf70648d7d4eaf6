//! Country cache handlers

use super::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use country_core::{CountryError, CountryFilter, CountryRecord, CountrySort, RefreshSummary};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    region: Option<String>,
    currency: Option<String>,
    sort: Option<String>,
}

pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshSummary>, ApiError> {
    let summary = state.refresh.run().await?;
    Ok(Json(summary))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CountryRecord>>, ApiError> {
    let filter = CountryFilter {
        region: params.region,
        currency: params.currency,
    }
    .normalized();
    let sort = CountrySort::parse_or_default(params.sort.as_deref());

    tracing::debug!("Listing countries: filter={:?}, sort={}", filter, sort);
    Ok(Json(state.store.list_all(&filter, sort).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CountryRecord>, ApiError> {
    state
        .store
        .get_by_name(&name)
        .await?
        .map(Json)
        .ok_or_else(|| CountryError::NotFound(name).into())
}

pub async fn delete(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.delete(&name).await? {
        return Err(CountryError::NotFound(name).into());
    }

    tracing::info!("Deleted country {}", name);
    Ok(Json(json!({ "message": "Country deleted successfully" })))
}

pub async fn image(State(state): State<AppState>) -> Response {
    match tokio::fs::read(state.renderer.image_path()).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Summary image not found" })),
        )
            .into_response(),
        Err(e) => ApiError(CountryError::Io(e)).into_response(),
    }
}
