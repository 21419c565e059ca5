pub mod init;
pub mod lead;
pub mod stages;
