//! Prompt sent to the generative model.

use crate::models::{Scope, UsageSummary};

// ---

/// Build the suggestion prompt for a usage summary.
///
/// The summary is embedded as pretty-printed JSON. The model is told to
/// answer with a JSON array of 5–8 short sentences and is shown an example;
/// the answer is still run through the extractor since that is not binding.
pub fn build_prompt(scope: Scope, summary: &UsageSummary) -> serde_json::Result<String> {
    // ---
    let framing = match scope {
        Scope::AllRooms => "multiple rooms",
        Scope::SingleRoom => "a single room",
    };
    let data = serde_json::to_string_pretty(summary)?;

    Ok(format!(
        r#"
You are an energy-efficiency assistant.

You receive an aggregated summary of electricity usage for {framing}.

Data:
{data}

Generate 5–8 short, concrete suggestions to reduce energy consumption and cost.
Each suggestion must be one sentence, <150 characters, and very actionable.

Return ONLY a JSON array of strings.
Example:
[
  "Turn off lights in empty rooms.",
  "Shift laundry to off-peak hours."
]
"#
    ))
}
