//! dotnet-locator - Find the installed .NET toolchain.
//!
//! Discovers the installation root, host version, installed SDKs and shared
//! frameworks, and the `global.json` pin that applies to a directory. Three
//! strategies are tried in order until one succeeds: the native host
//! library, a scan of the installation layout, and `dotnet --info`.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`discovery`] - PATH search, root discovery and `global.json` lookup
//! - [`environment`] - Environment variable access and path expansion
//! - [`error`] - Error types and result aliases
//! - [`locator`] - Strategy orchestration
//! - [`model`] - Installation records
//! - [`platform`] - OS family rules and host identification
//! - [`shell`] - Child process execution
//! - [`strategies`] - The discovery strategies
//! - [`ui`] - Terminal output
//! - [`version`] - Version ordering
//!
//! # Example
//!
//! ```
//! use dotnet_locator::version::compare_versions;
//! use std::cmp::Ordering;
//!
//! assert_eq!(compare_versions("9.0.0-preview.1", "8.9.999"), Ordering::Greater);
//! ```
//!
//! For discovery against real installation trees, see the integration tests.

pub mod cli;
pub mod discovery;
pub mod environment;
pub mod error;
pub mod locator;
pub mod model;
pub mod platform;
pub mod shell;
pub mod strategies;
pub mod ui;
pub mod version;

pub use error::{LocatorError, Result};
pub use locator::{get_installation_info, Locator};
pub use model::{FrameworkInfo, HostInfo, InstallationInfo, RuntimeEnvironment, SdkInfo};
