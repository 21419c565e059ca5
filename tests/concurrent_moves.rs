//! Concurrent stage moves on one stored lead

use leadengine::fs::lead_dir::LeadDir;
use leadengine::fs::lead_files::{create_lead, load_lead, transition_lead};
use leadengine::models::lead::Lead;
use leadengine::SalesStage;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[test]
fn test_concurrent_moves_keep_history_consistent() {
    let temp_dir = TempDir::new().unwrap();
    let lead_dir = Arc::new(LeadDir::new(temp_dir.path()));
    lead_dir.initialize().unwrap();

    let lead = Lead::new(
        "lead-busy".to_string(),
        "Busy Lead".to_string(),
        SalesStage::Proposal,
    );
    create_lead(&lead, &lead_dir).unwrap();

    // Documentation and Awaiting can move to each other, so every ordering is legal
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let lead_dir = Arc::clone(&lead_dir);
            let target = if i % 2 == 0 {
                SalesStage::Documentation
            } else {
                SalesStage::Awaiting
            };
            thread::spawn(move || transition_lead("lead-busy", target, &lead_dir))
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .unwrap()
            .expect("Every move should be accepted");
    }

    let stored = load_lead("lead-busy", &lead_dir).unwrap();
    assert!(matches!(
        stored.stage(),
        SalesStage::Documentation | SalesStage::Awaiting
    ));
    assert!(!stored.history.is_empty());
    assert_eq!(stored.history[0].from, SalesStage::Proposal);

    for pair in stored.history.windows(2) {
        assert_eq!(pair[0].to, pair[1].from, "history chain is broken");
    }
    assert_eq!(stored.history.last().map(|c| c.to), Some(stored.stage()));
}

#[test]
fn test_concurrent_illegal_moves_are_all_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let lead_dir = Arc::new(LeadDir::new(temp_dir.path()));
    lead_dir.initialize().unwrap();

    let lead = Lead::new("lead-new".to_string(), "Fresh".to_string(), SalesStage::New);
    create_lead(&lead, &lead_dir).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let lead_dir = Arc::clone(&lead_dir);
            thread::spawn(move || transition_lead("lead-new", SalesStage::Settlement, &lead_dir))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_err());
    }

    let stored = load_lead("lead-new", &lead_dir).unwrap();
    assert_eq!(stored.stage(), SalesStage::New);
    assert!(stored.history.is_empty());
}

#[test]
fn test_move_racing_creation_sees_a_complete_lead() {
    let temp_dir = TempDir::new().unwrap();
    let lead_dir = Arc::new(LeadDir::new(temp_dir.path()));
    lead_dir.initialize().unwrap();

    for round in 0..200 {
        let lead_id = format!("race-{round}");

        let mover = {
            let lead_dir = Arc::clone(&lead_dir);
            let lead_id = lead_id.clone();
            thread::spawn(move || loop {
                match transition_lead(&lead_id, SalesStage::Connected, &lead_dir) {
                    Err(e) if e.to_string().contains("Lead not found") => thread::yield_now(),
                    other => return other.map_err(|e| format!("{e:#}")),
                }
            })
        };

        let lead = Lead::new(lead_id.clone(), "Racer".to_string(), SalesStage::New);
        create_lead(&lead, &lead_dir).unwrap();

        let moved = mover
            .join()
            .unwrap()
            .unwrap_or_else(|e| panic!("round {round}: {e}"));
        assert_eq!(moved.stage(), SalesStage::Connected);
    }

    let leads = leadengine::fs::lead_files::list_all_leads(&lead_dir).unwrap();
    assert_eq!(leads.len(), 200);
}
