mod types;


pub use types::{Lead, StageChange};
