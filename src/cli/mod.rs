//! CLI module for askr - command-line interface and subcommands.
//!
//! With no subcommand the chat TUI starts; `ask` runs a single turn and
//! prints the result.

pub mod commands;

pub use commands::Cli;
