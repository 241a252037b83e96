//! Error types for toolchain discovery.
//!
//! This module defines [`LocatorError`], the error type returned by every
//! discovery strategy and by the public entry point, and a [`Result`] type
//! alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Each strategy converts its internal failures into a `LocatorError` kind
//!   instead of letting them escape
//! - Panics raised inside a strategy are caught by the
//!   [`Locator`](crate::Locator) and recorded as a [`StrategyFault`]
//! - Use `anyhow::Error` (via `LocatorError::Other`) for unexpected errors
//! - All errors carry a message that can be shown to users as-is

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for discovery operations.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// No installation root could be determined.
    #[error("dotnet root not found: {message}")]
    RootNotFound { message: String },

    /// The `dotnet` executable could not be located.
    #[error("dotnet executable not found: {message}")]
    ExecutableNotFound { message: String },

    /// The native host resolution library could not be loaded.
    #[error("Failed to load native host library at {path}: {message}")]
    NativeLibraryLoad { path: PathBuf, message: String },

    /// The native host resolution library reported a failure status.
    #[error("Native host library call failed with status {status:#x}")]
    NativeCallFailed { status: i32 },

    /// The diagnostic command failed to run or exited unsuccessfully.
    #[error("Command failed with exit code {exit_code:?}: {command}: {stderr}")]
    ProcessFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Diagnostic output or configuration could not be parsed.
    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// A caller-supplied argument was missing or invalid.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Every discovery strategy failed without reporting a failure of its own.
    #[error("{message}")]
    AllStrategiesFailed {
        message: String,
        #[source]
        fault: Option<StrategyFault>,
    },

    /// The operation was cancelled through its cancellation token.
    #[error("Discovery was cancelled")]
    Cancelled,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LocatorError {
    /// Whether this error represents a cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// A panic caught while running a discovery strategy.
#[derive(Debug, Clone, Error)]
#[error("{strategy} strategy panicked: {message}")]
pub struct StrategyFault {
    /// Name of the strategy that panicked.
    pub strategy: &'static str,
    /// Panic payload rendered as text.
    pub message: String,
}

impl StrategyFault {
    /// Build a fault from a panic payload returned by `catch_unwind`.
    pub fn from_panic(strategy: &'static str, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self { strategy, message }
    }
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, LocatorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn root_not_found_displays_message() {
        let err = LocatorError::RootNotFound {
            message: "no DOTNET_ROOT".into(),
        };
        assert!(err.to_string().contains("no DOTNET_ROOT"));
    }

    #[test]
    fn native_load_displays_path() {
        let err = LocatorError::NativeLibraryLoad {
            path: PathBuf::from("/usr/share/dotnet/host/fxr/8.0.0/libhostfxr.so"),
            message: "missing".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("libhostfxr.so"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn process_failed_displays_code_and_stderr() {
        let err = LocatorError::ProcessFailed {
            command: "dotnet --info".into(),
            exit_code: Some(3),
            stderr: "boom".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("dotnet --info"));
        assert!(msg.contains('3'));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn native_call_failed_displays_hex_status() {
        let err = LocatorError::NativeCallFailed { status: 0x8000_8083u32 as i32 };
        assert!(err.to_string().contains("0x80008083"));
    }

    #[test]
    fn all_strategies_failed_exposes_fault_as_source() {
        let err = LocatorError::AllStrategiesFailed {
            message: "All discovery strategies failed".into(),
            fault: Some(StrategyFault {
                strategy: "native",
                message: "bad pointer".into(),
            }),
        };
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("native"));
        assert!(source.contains("bad pointer"));
    }

    #[test]
    fn fault_from_str_and_string_payloads() {
        let fault = StrategyFault::from_panic("process", Box::new("static text"));
        assert_eq!(fault.message, "static text");

        let fault = StrategyFault::from_panic("process", Box::new(String::from("owned")));
        assert_eq!(fault.message, "owned");

        let fault = StrategyFault::from_panic("process", Box::new(42_u8));
        assert_eq!(fault.message, "unknown panic payload");
    }

    #[test]
    fn cancelled_is_detected() {
        assert!(LocatorError::Cancelled.is_cancelled());
        assert!(!LocatorError::InvalidArgument {
            message: "x".into()
        }
        .is_cancelled());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: LocatorError = io_err.into();
        assert!(matches!(err, LocatorError::Io(_)));
    }
}
