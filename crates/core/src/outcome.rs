//! The pipeline's terminal outcome.

use crate::backend::DeltaStream;

/// Exactly one of these is produced per successfully processed request.
///
/// A rejection is a normal outcome, not an error: its message body is
/// served to the client as assistant text. Failures (empty conversation,
/// unconfigured or unreachable provider) are raised as errors instead and
/// never appear here.
#[derive(Debug)]
pub enum ChatOutcome {
    /// The topic filter declined the question.
    Rejected { message: String },

    /// The question was relayed upstream; deltas arrive in order.
    Streaming { deltas: DeltaStream },
}

impl ChatOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
