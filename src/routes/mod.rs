//! Route gateway: merges every subrouter and applies the shared layers.

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::SharedModel;

mod health;
mod suggestions;
mod usage;

pub use suggestions::{SuggestionRequest, SuggestionResponse};
pub use usage::UsageRequest;

// ---

pub fn router(model: SharedModel) -> Router {
    // ---
    Router::new()
        .merge(suggestions::router())
        .merge(usage::router())
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(model)
}
