//! CLI argument models for the Wren launcher binary.
//!
//! Exposes the clap-backed `Cli` plus the value enums and parsers that keep
//! invalid presets from ever reaching the launch sequence.

pub mod cli_args;
pub mod cli_types;

pub use cli_args::Cli;
pub use cli_types::*;
