//! `POST /api/energy-suggestions`: summary in, suggestion list out.
//!
//! Builds the prompt from the caller's summary, calls the generative model
//! once (the client owns timeout and retry), and runs the raw text through
//! the extractor.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::{build_prompt, extract_suggestions, Scope, SharedModel, UsageSummary};

// ---

/// Inbound body. `spaceName` is a display label and does not affect the prompt.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    // ---
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub space_name: Option<String>,
    pub summary: UsageSummary,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SuggestionResponse {
    pub insights: Vec<String>,
}

pub fn router() -> Router<SharedModel> {
    // ---
    Router::new().route("/api/energy-suggestions", post(handler))
}

async fn handler(
    State(model): State<SharedModel>,
    payload: std::result::Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<Json<SuggestionResponse>> {
    // ---
    let Json(request) = payload?;
    let span = info_span!(
        "energy_suggestions",
        request_id = %Uuid::new_v4(),
        scope = ?request.scope,
        space = request.space_name.as_deref().unwrap_or(""),
    );

    async move {
        info!(rooms = request.summary.rooms.len(), "POST /api/energy-suggestions");

        let prompt = build_prompt(request.scope, &request.summary)?;
        let raw = model.generate(&prompt).await?;
        debug!(chars = raw.len(), "model response received");

        let insights = extract_suggestions(&raw);
        info!(count = insights.len(), "suggestions extracted");

        Ok::<_, AppError>(Json(SuggestionResponse { insights }))
    }
    .instrument(span)
    .await
}
