pub mod config;
pub mod init;
pub mod orders;
pub mod populate;
