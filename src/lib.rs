//! WattWise insights service.
//!
//! Turns raw electricity readings into a compact usage summary, asks a
//! generative model for energy-saving suggestions, and recovers a clean list
//! of suggestions from whatever text the model sends back.
//!
//! Modules talk to each other only through the re-exports below, so routes
//! know their parent and not each other's files.
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod kpi;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod routes;
pub mod suggestions;
pub mod summary;

pub use config::Config;
pub use error::{AppError, Result};
pub use kpi::{build_kpis, DashboardKpis};
pub use llm::{GeminiClient, SuggestionModel};
pub use models::{
    DeviceTotals, EnergyRecord, OverallTotals, Period, RoomSummary, Scope, UsageSummary,
};
pub use prompt::build_prompt;
pub use routes::router;
pub use suggestions::extract_suggestions;
pub use summary::{summarize, summarize_scope};

/// Generative model shared by all request handlers.
pub type SharedModel = Arc<dyn SuggestionModel>;
