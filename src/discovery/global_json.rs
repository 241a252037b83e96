//! `global.json` lookup.
//!
//! A project pins its SDK with a `global.json` file in the project directory
//! or any ancestor:
//!
//! ```json
//! { "sdk": { "version": "8.0.100", "rollForward": "latestFeature" } }
//! ```
//!
//! The nearest file that parses wins. A malformed file is skipped as if it
//! were absent, so the walk continues to the parent directory.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LocatorError, Result};

/// File name of the pinned-version configuration.
pub const GLOBAL_JSON: &str = "global.json";

/// A parsed `global.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalJson {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// `sdk.version`, if present.
    pub sdk_version: Option<String>,
    /// `sdk.rollForward`, if present.
    pub roll_forward: Option<String>,
    /// `sdk.allowPrerelease`, if present.
    pub allow_prerelease: Option<bool>,
}

/// Find the `global.json` that applies to `start`.
///
/// Walks from `start` through each ancestor and stops at the filesystem
/// root. Returns `None` when no usable file exists.
pub fn find_global_json(start: &Path) -> Option<GlobalJson> {
    let start = std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf());

    for dir in start.ancestors() {
        let candidate = dir.join(GLOBAL_JSON);
        if !candidate.is_file() {
            continue;
        }

        match read_global_json(&candidate) {
            Ok(global_json) => {
                tracing::debug!(
                    path = %candidate.display(),
                    version = ?global_json.sdk_version,
                    "found global.json"
                );
                return Some(global_json);
            }
            Err(e) => {
                tracing::trace!(path = %candidate.display(), error = %e, "skipping unusable global.json");
            }
        }
    }

    None
}

/// Pair form of [`find_global_json`]: `(path, sdk.version)`, both `None`
/// when nothing applies.
pub fn find_pin(start: &Path) -> (Option<PathBuf>, Option<String>) {
    match find_global_json(start) {
        Some(g) => (Some(g.path), g.sdk_version),
        None => (None, None),
    }
}

/// Read and parse one `global.json`.
pub fn read_global_json(path: &Path) -> Result<GlobalJson> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| LocatorError::Parse {
            what: path.display().to_string(),
            message: e.to_string(),
        })?;

    let sdk = &value["sdk"];
    Ok(GlobalJson {
        path: path.to_path_buf(),
        sdk_version: sdk["version"].as_str().map(String::from),
        roll_forward: sdk["rollForward"].as_str().map(String::from),
        allow_prerelease: sdk["allowPrerelease"].as_bool(),
    })
}
