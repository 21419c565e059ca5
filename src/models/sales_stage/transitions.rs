use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use super::error::StageTransitionError;
use super::types::SalesStage;

use SalesStage::{
    Awaiting, AwaitingClient, Connected, Documentation, DocumentationRegistration, New, Proposal,
    Qualification, Recycle, Settlement, SettlementApproved, Unknown,
};

/// Every legal one-step move, keyed by source stage.
///
/// Each row lists the source itself (re-saving a lead is a no-op) and
/// `Unknown`. Skipping ahead is only allowed where a row says so; in
/// particular nothing before `Proposal` reaches `Settlement`, and only
/// `Settlement` reaches `SettlementApproved`.
const STAGE_TRANSITIONS: &[(SalesStage, &[SalesStage])] = &[
    (New, &[New, Connected, Qualification, Recycle, Unknown]),
    (
        Connected,
        &[Connected, Qualification, Proposal, AwaitingClient, Recycle, Unknown],
    ),
    (
        Qualification,
        &[Qualification, Proposal, Documentation, AwaitingClient, Recycle, Unknown],
    ),
    (
        Proposal,
        &[
            Proposal,
            Documentation,
            Awaiting,
            AwaitingClient,
            Settlement,
            Recycle,
            Unknown,
        ],
    ),
    (
        Documentation,
        &[
            Documentation,
            DocumentationRegistration,
            Awaiting,
            AwaitingClient,
            Settlement,
            Recycle,
            Unknown,
        ],
    ),
    (
        DocumentationRegistration,
        &[
            DocumentationRegistration,
            Awaiting,
            AwaitingClient,
            Settlement,
            Recycle,
            Unknown,
        ],
    ),
    (
        Awaiting,
        &[
            Awaiting,
            Documentation,
            DocumentationRegistration,
            AwaitingClient,
            Settlement,
            Recycle,
            Unknown,
        ],
    ),
    (
        AwaitingClient,
        &[
            AwaitingClient,
            Qualification,
            Proposal,
            Documentation,
            Awaiting,
            Settlement,
            Recycle,
            Unknown,
        ],
    ),
    (
        Settlement,
        &[Settlement, SettlementApproved, Awaiting, Recycle, Unknown],
    ),
    (SettlementApproved, &[SettlementApproved, Recycle, Unknown]),
    (Recycle, &[Recycle, New, Connected, Unknown]),
    (Unknown, &SalesStage::ALL),
];

static TRANSITION_TABLE: LazyLock<HashMap<SalesStage, HashSet<SalesStage>>> =
    LazyLock::new(|| {
        STAGE_TRANSITIONS
            .iter()
            .map(|(from, targets)| (*from, targets.iter().copied().collect()))
            .collect()
    });

/// Check whether `to` is reachable from `from` in one move.
///
/// A source stage with no registered row has no legal moves.
pub fn can_transition(from: SalesStage, to: SalesStage) -> bool {
    TRANSITION_TABLE
        .get(&from)
        .is_some_and(|targets| targets.contains(&to))
}

/// Fail with a [`StageTransitionError`] carrying both stages when the move is
/// not in the table. Never mutates anything; the caller applies the change.
pub fn assert_transition(from: SalesStage, to: SalesStage) -> Result<(), StageTransitionError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(StageTransitionError { from, to })
    }
}

/// Legal targets from `from`, in funnel order.
pub fn allowed_transitions(from: SalesStage) -> Vec<SalesStage> {
    SalesStage::ALL
        .into_iter()
        .filter(|to| can_transition(from, *to))
        .collect()
}

impl SalesStage {
    /// Check if moving from this stage to `new_stage` is legal.
    pub fn can_transition_to(&self, new_stage: &SalesStage) -> bool {
        can_transition(*self, *new_stage)
    }

    /// Validate a move, returning the target stage on success.
    ///
    /// # Returns
    /// `Ok(new_stage)` if the transition is legal, `Err` otherwise
    pub fn try_transition(&self, new_stage: SalesStage) -> Result<SalesStage, StageTransitionError> {
        assert_transition(*self, new_stage)?;
        Ok(new_stage)
    }

    /// Returns the stages this stage can move to, itself included.
    pub fn valid_transitions(&self) -> Vec<SalesStage> {
        allowed_transitions(*self)
    }
}
