mod error;
mod transitions;
mod types;


pub use error::{ParseSalesStageError, StageTransitionError};
pub use transitions::{allowed_transitions, assert_transition, can_transition};
pub use types::SalesStage;
