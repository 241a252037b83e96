//! Access to environment variables and directories.
//!
//! - [`vars`] - The [`Environment`] capability and its implementations
//! - [`expand`] - `%VAR%` / `$VAR` / `~` expansion for path strings

pub mod expand;
pub mod vars;

pub use expand::{expand_home, expand_vars};
pub use vars::{Environment, MapEnvironment, SystemEnvironment};
