//! Processing result types.

use crate::workflow::UpdateOutcome;
use serde::Serialize;

/// Result of processing a single repository.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProcessingResult {
    /// The update workflow ran.
    Processed(UpdateOutcome),

    /// Processing was skipped.
    Skipped {
        /// Repository full name.
        repository: String,
        /// Reason for skipping.
        reason: String,
    },
}
