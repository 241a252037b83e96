//! Installation data produced by the discovery strategies.
//!
//! Every strategy builds its result through [`InstallationInfo::new`], which
//! deduplicates and orders the SDK and framework lists.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::discovery::GlobalJson;
use crate::version::VersionKey;

/// Version reported when the host version cannot be determined.
pub const UNKNOWN_VERSION: &str = "unknown";

/// An installed SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdkInfo {
    pub version: String,
    /// Absolute path of the SDK directory (`<root>/sdk/<version>`).
    pub path: PathBuf,
    /// Build commit, when known.
    pub commit: Option<String>,
}

/// An installed shared framework (runtime).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkInfo {
    /// Framework name, e.g. `Microsoft.NETCore.App`.
    pub name: String,
    pub version: String,
    /// Absolute path of the framework version directory.
    pub path: PathBuf,
    pub commit: Option<String>,
}

/// The `dotnet` host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostInfo {
    pub version: String,
    pub architecture: String,
    pub commit: Option<String>,
    /// Path of the `dotnet` executable.
    pub executable: PathBuf,
}

/// Description of the machine the toolchain runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeEnvironment {
    pub os_description: String,
    /// Runtime identifier, e.g. `linux-x64`.
    pub rid: String,
    /// Base path of the active SDK, or the root when no SDK is installed.
    pub base_path: PathBuf,
    /// Additional properties reported by the toolchain.
    pub properties: BTreeMap<String, String>,
}

/// Everything known about one toolchain installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationInfo {
    pub root: PathBuf,
    pub host: HostInfo,
    pub runtime_environment: RuntimeEnvironment,
    /// Installed SDKs, newest first.
    pub sdks: Vec<SdkInfo>,
    /// Installed frameworks, by name, newest version first within a name.
    pub frameworks: Vec<FrameworkInfo>,
    /// The `global.json` governing the probing directory, if any.
    pub global_json: Option<GlobalJson>,
}

impl InstallationInfo {
    /// Assemble an installation, enforcing list ordering and uniqueness.
    ///
    /// Duplicate SDK versions and duplicate (name, version) framework pairs
    /// keep their first occurrence.
    pub fn new(
        root: PathBuf,
        host: HostInfo,
        runtime_environment: RuntimeEnvironment,
        sdks: Vec<SdkInfo>,
        frameworks: Vec<FrameworkInfo>,
        global_json: Option<GlobalJson>,
    ) -> Self {
        Self {
            root,
            host,
            runtime_environment,
            sdks: sort_sdks(sdks),
            frameworks: sort_frameworks(frameworks),
            global_json,
        }
    }

    /// The newest installed SDK.
    pub fn latest_sdk(&self) -> Option<&SdkInfo> {
        self.sdks.first()
    }

    /// Look up an installed SDK by exact version.
    pub fn sdk(&self, version: &str) -> Option<&SdkInfo> {
        self.sdks.iter().find(|s| s.version == version)
    }

    /// All installed versions of one framework, newest first.
    pub fn frameworks_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a FrameworkInfo> + 'a {
        self.frameworks.iter().filter(move |f| f.name == name)
    }

    /// The SDK version pinned by `global.json`.
    pub fn pinned_sdk_version(&self) -> Option<&str> {
        self.global_json.as_ref()?.sdk_version.as_deref()
    }

    /// Path of the `global.json` that applies, if any.
    pub fn global_json_path(&self) -> Option<&Path> {
        self.global_json.as_ref().map(|g| g.path.as_path())
    }
}

/// Deduplicate by version and sort newest first.
pub fn sort_sdks(sdks: Vec<SdkInfo>) -> Vec<SdkInfo> {
    let mut seen = HashSet::new();
    let mut sdks: Vec<SdkInfo> = sdks
        .into_iter()
        .filter(|s| seen.insert(s.version.clone()))
        .collect();
    sdks.sort_by(|a, b| VersionKey::parse(&b.version).cmp(&VersionKey::parse(&a.version)));
    sdks
}

/// Deduplicate by (name, version), sort by name then newest version first.
pub fn sort_frameworks(frameworks: Vec<FrameworkInfo>) -> Vec<FrameworkInfo> {
    let mut seen = HashSet::new();
    let mut frameworks: Vec<FrameworkInfo> = frameworks
        .into_iter()
        .filter(|f| seen.insert((f.name.clone(), f.version.clone())))
        .collect();
    frameworks.sort_by(|a, b| {
        a.name.cmp(&b.name).then_with(|| {
            VersionKey::parse(&b.version).cmp(&VersionKey::parse(&a.version))
        })
    });
    frameworks
}
