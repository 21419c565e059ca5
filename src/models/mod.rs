pub mod lead;
pub mod sales_stage;
