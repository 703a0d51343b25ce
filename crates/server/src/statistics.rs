//! Statistics API endpoints

use api_types::{
    DataResponse,
    stats::{AlertKind as ApiAlertKind, AlertView, Statistic},
};
use axum::{Json, extract::State};
use engine::AlertKind;

use crate::{
    ServerError,
    contributions::{map_totals, per_category},
    server::ServerState,
};

fn map_kind(kind: AlertKind) -> ApiAlertKind {
    match kind {
        AlertKind::Warning => ApiAlertKind::Warning,
        AlertKind::Info => ApiAlertKind::Info,
    }
}

/// Handle requests for the dashboard statistics
pub async fn get_stats(
    State(state): State<ServerState>,
) -> Result<Json<DataResponse<Statistic>>, ServerError> {
    let stats = state.engine.statistics().await?;

    Ok(Json(DataResponse::new(Statistic {
        guests_count: stats.guests_count,
        contributions_count: stats.contributions_count,
        total_servings: stats.total_servings,
        servings_per_guest: stats.servings_per_guest,
        category_coverage: per_category(stats.category_coverage, |covered| covered),
        by_category: per_category(stats.by_category, map_totals),
        alerts: stats
            .alerts
            .into_iter()
            .map(|alert| AlertView {
                kind: map_kind(alert.kind),
                message: alert.message,
            })
            .collect(),
    })))
}
