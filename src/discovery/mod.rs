//! Locating the toolchain on disk.
//!
//! - [`path`] - Finding the `dotnet` executable on PATH
//! - [`root`] - Choosing the installation root
//! - [`global_json`] - Finding a project's pinned SDK

pub mod global_json;
pub mod path;
pub mod root;

pub use global_json::{find_global_json, find_pin, GlobalJson, GLOBAL_JSON};
pub use path::ExecutableResolver;
pub use root::{RootDiscovery, ROOT_OVERRIDE_VAR};
