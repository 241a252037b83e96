//! Installation discovery by directory layout.
//!
//! An installation root looks like this:
//!
//! ```text
//! <root>/
//!   dotnet
//!   host/fxr/<version>/libhostfxr.so
//!   sdk/<version>/{Sdks/, dotnet.dll, dotnet.runtimeconfig.json, .version}
//!   shared/<framework name>/<version>/{*.dll, *.so, *.dylib, .version}
//! ```
//!
//! The scan mirrors how the host itself enumerates SDKs and frameworks, so
//! it reaches the same answer without loading native code.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{local_runtime_environment, DiscoveryContext, ProbeRequest};
use crate::discovery::find_global_json;
use crate::error::{LocatorError, Result};
use crate::model::{FrameworkInfo, HostInfo, InstallationInfo, SdkInfo, UNKNOWN_VERSION};
use crate::platform::{self, OsFamily};
use crate::version::{self, VersionKey};

/// Files or directories whose presence marks a usable SDK directory.
const SDK_MARKERS: &[&str] = &["Sdks", "dotnet.dll", "dotnet.runtimeconfig.json"];

/// Extensions of the native or managed libraries inside a framework.
const FRAMEWORK_LIBRARY_EXTENSIONS: &[&str] = &["dll", "so", "dylib"];

/// File holding the build commit on its first line.
const VERSION_FILE: &str = ".version";

/// Scans the installation root on disk.
pub struct FilesystemScanStrategy {
    context: Arc<DiscoveryContext>,
}

impl FilesystemScanStrategy {
    pub fn new(context: Arc<DiscoveryContext>) -> Self {
        Self { context }
    }

    pub async fn run(
        &self,
        request: &ProbeRequest,
        cancel: &CancellationToken,
    ) -> Result<InstallationInfo> {
        let root = self
            .context
            .resolve_root(request.explicit_root.as_deref(), cancel)
            .await?
            .ok_or_else(|| LocatorError::RootNotFound {
                message: "set DOTNET_ROOT or add dotnet to PATH".to_string(),
            })?;

        let mut info = scan(&root, self.context.family);
        info.global_json = find_global_json(&request.probing_dir);
        Ok(info)
    }
}

/// Build an installation description from the layout under `root`.
///
/// Missing `sdk/` or `shared/` directories yield empty lists.
pub fn scan(root: &Path, family: OsFamily) -> InstallationInfo {
    let sdks = scan_sdks(root);
    let frameworks = scan_frameworks(root);
    tracing::debug!(
        root = %root.display(),
        sdks = sdks.len(),
        frameworks = frameworks.len(),
        "scanned installation"
    );

    let host = HostInfo {
        version: host_version(root),
        architecture: platform::current_architecture().to_string(),
        commit: None,
        executable: root.join(family.executable_name()),
    };
    let runtime_environment = local_runtime_environment(root, &sdks);

    InstallationInfo::new(
        root.to_path_buf(),
        host,
        runtime_environment,
        sdks,
        frameworks,
        None,
    )
}

/// Greatest version under `host/fxr`, or `"unknown"`.
pub fn host_version(root: &Path) -> String {
    version_dirs(&root.join("host").join("fxr"))
        .into_iter()
        .map(|(version, _)| version)
        .max_by_key(|version| VersionKey::parse(version))
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}

/// SDK directories under `sdk/` that contain an SDK marker.
pub fn scan_sdks(root: &Path) -> Vec<SdkInfo> {
    version_dirs(&root.join("sdk"))
        .into_iter()
        .filter(|(_, dir)| SDK_MARKERS.iter().any(|marker| dir.join(marker).exists()))
        .map(|(version, path)| SdkInfo {
            commit: read_commit(&path),
            version,
            path,
        })
        .collect()
}

/// Framework version directories under `shared/<name>/` holding a library.
pub fn scan_frameworks(root: &Path) -> Vec<FrameworkInfo> {
    let mut frameworks = Vec::new();

    for (name, name_dir) in child_dirs(&root.join("shared")) {
        for (version, path) in version_dirs(&name_dir) {
            if !contains_library(&path) {
                tracing::trace!(path = %path.display(), "skipping framework without libraries");
                continue;
            }
            frameworks.push(FrameworkInfo {
                name: name.clone(),
                commit: read_commit(&path),
                version,
                path,
            });
        }
    }

    frameworks
}

fn child_dirs(dir: &Path) -> Vec<(String, PathBuf)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::trace!(dir = %dir.display(), error = %e, "cannot list directory");
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            Some((name, entry.path()))
        })
        .collect()
}

fn version_dirs(dir: &Path) -> Vec<(String, PathBuf)> {
    child_dirs(dir)
        .into_iter()
        .filter(|(name, _)| version::is_valid(name))
        .collect()
}

fn contains_library(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };

    entries.filter_map(|entry| entry.ok()).any(|entry| {
        let path = entry.path();
        path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    FRAMEWORK_LIBRARY_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                })
    })
}

fn read_commit(dir: &Path) -> Option<String> {
    let content = fs::read_to_string(dir.join(VERSION_FILE)).ok()?;
    content
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}
