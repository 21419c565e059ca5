use thiserror::Error;

use super::types::SalesStage;

/// A move between two stages that the transition table does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid sales stage transition: {from} -> {to}")]
pub struct StageTransitionError {
    pub from: SalesStage,
    pub to: SalesStage,
}

impl StageTransitionError {
    /// Message suitable for showing to the person who requested the move.
    pub fn user_message(&self) -> String {
        format!(
            "Cannot move this lead directly from {} to {}",
            self.from.label(),
            self.to.label()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sales stage: '{0}'")]
pub struct ParseSalesStageError(pub String);
