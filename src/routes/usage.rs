//! Usage endpoints that work on raw readings.
//!
//! - `POST /api/usage-summary` – summary for the selected scope
//! - `POST /api/kpis` – headline dashboard figures

use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::{build_kpis, summarize_scope, DashboardKpis, EnergyRecord, Scope, UsageSummary};

// ---

#[derive(Debug, Deserialize, Serialize)]
pub struct UsageRequest {
    // ---
    #[serde(default)]
    pub scope: Scope,
    /// Room to keep when `scope` is a single room.
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub records: Vec<EnergyRecord>,
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // ---
    Router::new()
        .route("/api/usage-summary", post(summary_handler))
        .route("/api/kpis", post(kpis_handler))
}

async fn summary_handler(
    payload: std::result::Result<Json<UsageRequest>, JsonRejection>,
) -> Result<Json<UsageSummary>> {
    // ---
    let Json(request) = payload?;
    info!(
        "POST /api/usage-summary - {} records, scope {:?}",
        request.records.len(),
        request.scope
    );

    let summary = summarize_scope(&request.records, request.scope, request.room.as_deref());
    Ok(Json(summary))
}

async fn kpis_handler(
    payload: std::result::Result<Json<UsageRequest>, JsonRejection>,
) -> Result<Json<DashboardKpis>> {
    // ---
    let Json(request) = payload?;
    info!("POST /api/kpis - {} records", request.records.len());

    Ok(Json(build_kpis(&request.records)))
}
