//! Clocktower CLI library.
//!
//! Argument parsing, session assembly from configuration, and the
//! interactive driving loop behind the `clocktower` binary.

pub mod cli;
pub mod commands;
pub mod repl;
