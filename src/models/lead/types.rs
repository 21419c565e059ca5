use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::sales_stage::{SalesStage, StageTransitionError};

/// A sales lead and its position in the funnel.
///
/// The current stage is private: it changes through [`Lead::try_transition`],
/// or through [`Lead::force_stage`] for imports and repairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub contact: Option<String>,
    stage: SalesStage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub stage_changed_at: DateTime<Utc>,
    /// Applied stage changes, oldest first
    #[serde(default)]
    pub history: Vec<StageChange>,
}

/// One applied stage change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChange {
    pub from: SalesStage,
    pub to: SalesStage,
    pub at: DateTime<Utc>,
    /// Set when the change bypassed the transition table
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub forced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Lead {
    pub fn new(id: String, name: String, initial_stage: SalesStage) -> Self {
        let now = Utc::now();

        Self {
            id,
            name,
            contact: None,
            stage: initial_stage,
            created_at: now,
            updated_at: now,
            stage_changed_at: now,
            history: Vec::new(),
        }
    }

    pub fn stage(&self) -> SalesStage {
        self.stage
    }

    pub fn set_contact(&mut self, contact: Option<String>) {
        self.contact = contact;
        self.updated_at = Utc::now();
    }

    /// Move the lead to `new_stage` if the transition table allows it.
    ///
    /// A self-transition succeeds without recording history. On error the
    /// lead is left untouched.
    pub fn try_transition(&mut self, new_stage: SalesStage) -> Result<(), StageTransitionError> {
        let validated = match self.stage.try_transition(new_stage) {
            Ok(stage) => stage,
            Err(e) => {
                tracing::debug!(lead = %self.id, from = %e.from, to = %e.to, "rejected stage transition");
                return Err(e);
            }
        };

        if validated == self.stage {
            return Ok(());
        }

        self.apply(validated, false, None);
        tracing::debug!(lead = %self.id, stage = %validated, "applied stage transition");
        Ok(())
    }

    /// Set the stage without consulting the transition table.
    ///
    /// For migrations and legacy imports only. The change is recorded with
    /// `forced: true` and the given reason. Forcing the current stage is a
    /// no-op, like a self-transition.
    pub fn force_stage(&mut self, new_stage: SalesStage, reason: Option<String>) {
        if new_stage == self.stage {
            return;
        }

        tracing::warn!(
            lead = %self.id,
            from = %self.stage,
            to = %new_stage,
            reason = reason.as_deref().unwrap_or(""),
            "forcing stage change outside the transition table"
        );
        self.apply(new_stage, true, reason);
    }

    /// Most recent applied change, if any.
    pub fn last_change(&self) -> Option<&StageChange> {
        self.history.last()
    }

    fn apply(&mut self, new_stage: SalesStage, forced: bool, reason: Option<String>) {
        let now = Utc::now();
        self.history.push(StageChange {
            from: self.stage,
            to: new_stage,
            at: now,
            forced,
            reason,
        });
        self.stage = new_stage;
        self.stage_changed_at = now;
        self.updated_at = now;
    }
}
