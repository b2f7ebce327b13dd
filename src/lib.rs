//! Frostline - cargo economy core for an arctic rail trading game

pub mod core;
pub mod train;
