//! Alchemy CLI library.
//!
//! Subcommand handlers and output formatting for `alchemy-cli`.

pub mod commands;
pub mod output;
