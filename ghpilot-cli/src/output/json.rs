//! JSON output formatting.

use anyhow::Result;
use ghpilot_core::IssueOutcome;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// Per-issue outcomes with a tally.
#[derive(Debug, Serialize)]
pub struct OutcomeSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<IssueOutcome>,
}

impl OutcomeSummary {
    /// Tallies `outcomes`.
    pub fn new(outcomes: Vec<IssueOutcome>) -> Self {
        let failed = outcomes.iter().filter(|o| !o.success).count();
        Self {
            total: outcomes.len(),
            succeeded: outcomes.len() - failed,
            failed,
            outcomes,
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}
