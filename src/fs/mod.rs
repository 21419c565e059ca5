pub mod lead_dir;
pub mod lead_files;
pub mod locking;
