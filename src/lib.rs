//! Sales funnel stage guard and lead store for the LeadEngine CRM.
//!
//! The core is [`models::sales_stage`]: twelve funnel stages, the static table
//! of legal moves between them, and the [`can_transition`] /
//! [`assert_transition`] guards. [`models::lead::Lead`] owns one current
//! stage and changes it only through the guard; [`fs::lead_files`] persists
//! leads and applies stage changes under a per-file lock.

pub mod commands;
pub mod completions;
pub mod config;
pub mod fs;
pub mod models;
pub mod parser;
pub mod validation;

pub use models::sales_stage::{
    allowed_transitions, assert_transition, can_transition, SalesStage, StageTransitionError,
};
