//! Child process execution.

pub mod command;

pub use command::{capture, first_output_line, CommandOptions, CommandResult};
