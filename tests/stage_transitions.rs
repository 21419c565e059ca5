//! Integration tests for the sales stage guards and guarded lead moves

use leadengine::fs::lead_dir::LeadDir;
use leadengine::fs::lead_files::{create_lead, load_lead, transition_lead};
use leadengine::models::lead::Lead;
use leadengine::{allowed_transitions, assert_transition, can_transition};
use leadengine::{SalesStage, StageTransitionError};
use tempfile::TempDir;

#[test]
fn test_proposal_to_documentation_scenario() {
    assert!(can_transition(SalesStage::Proposal, SalesStage::Documentation));
    assert_transition(SalesStage::Proposal, SalesStage::Documentation)
        .expect("proposal -> documentation should be allowed");
}

#[test]
fn test_new_to_settlement_scenario() {
    let to: SalesStage = "liquidacao".parse().unwrap();
    assert!(!can_transition(SalesStage::New, to));

    let err = assert_transition(SalesStage::New, to).unwrap_err();
    assert!(err.to_string().contains("Invalid sales stage transition"));
    assert_eq!(
        err,
        StageTransitionError {
            from: SalesStage::New,
            to: SalesStage::Settlement
        }
    );
}

#[test]
fn test_no_stage_is_stuck() {
    for stage in SalesStage::ALL {
        let targets = allowed_transitions(stage);
        assert!(
            targets.iter().any(|t| *t != stage),
            "{stage:?} can only move to itself"
        );
    }
}

#[test]
fn test_guard_is_shareable_across_threads() {
    let handles: Vec<_> = SalesStage::ALL
        .into_iter()
        .map(|stage| {
            std::thread::spawn(move || {
                SalesStage::ALL
                    .into_iter()
                    .filter(|to| can_transition(stage, *to))
                    .count()
            })
        })
        .collect();

    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts.last(), Some(&SalesStage::ALL.len()));
}

#[test]
fn test_stored_lead_walks_the_funnel() {
    let temp_dir = TempDir::new().unwrap();
    let lead_dir = LeadDir::new(temp_dir.path());
    lead_dir.initialize().expect("Should initialize .leads");

    let lead = Lead::new(
        "lead-42".to_string(),
        "João Pereira".to_string(),
        SalesStage::New,
    );
    create_lead(&lead, &lead_dir).expect("Should create lead");

    for stage in [
        SalesStage::Connected,
        SalesStage::Qualification,
        SalesStage::Proposal,
        SalesStage::Settlement,
        SalesStage::SettlementApproved,
        SalesStage::Recycle,
        SalesStage::Connected,
    ] {
        let lead = transition_lead("lead-42", stage, &lead_dir)
            .unwrap_or_else(|e| panic!("Should move to {stage:?}: {e:#}"));
        assert_eq!(lead.stage(), stage);
    }

    // Recycling restarts early only
    transition_lead("lead-42", SalesStage::Recycle, &lead_dir).unwrap();
    assert!(transition_lead("lead-42", SalesStage::Proposal, &lead_dir).is_err());

    let stored = load_lead("lead-42", &lead_dir).unwrap();
    assert_eq!(stored.stage(), SalesStage::Recycle);
    assert_eq!(stored.history.len(), 8);
    assert!(stored.history.iter().all(|change| !change.forced));
}

#[test]
fn test_rejected_move_surfaces_transition_error() {
    let temp_dir = TempDir::new().unwrap();
    let lead_dir = LeadDir::new(temp_dir.path());
    lead_dir.initialize().unwrap();

    let lead = Lead::new(
        "lead-7".to_string(),
        "Ana".to_string(),
        SalesStage::Qualification,
    );
    create_lead(&lead, &lead_dir).unwrap();

    let err = transition_lead("lead-7", SalesStage::SettlementApproved, &lead_dir).unwrap_err();
    let transition_err = err
        .downcast_ref::<StageTransitionError>()
        .expect("Should carry the transition error");
    assert_eq!(transition_err.from, SalesStage::Qualification);
    assert_eq!(transition_err.to, SalesStage::SettlementApproved);

    let stored = load_lead("lead-7", &lead_dir).unwrap();
    assert_eq!(stored.stage(), SalesStage::Qualification);
    assert!(stored.history.is_empty());
}
