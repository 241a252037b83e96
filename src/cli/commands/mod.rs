//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which runs discovery
//! when the command needs it and then hands the result to the command.

pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod info;
pub mod pin;
pub mod root;
pub mod runtimes;
pub mod sdks;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
