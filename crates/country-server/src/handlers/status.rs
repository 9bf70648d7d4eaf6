//! Cache status

use super::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use country_core::StatusReport;

pub async fn status(State(state): State<AppState>) -> Result<Json<StatusReport>, ApiError> {
    Ok(Json(StatusReport {
        total_countries: state.store.count().await?,
        last_refreshed_at: state.store.most_recent_refresh().await?,
    }))
}
