//! Subcommand implementations.

pub mod init;
pub mod seed;
pub mod stock;
pub mod token;
