//! Discovery through the host resolution library (`hostfxr`).
//!
//! The library ships inside every installation under
//! `host/fxr/<version>/` and can enumerate SDKs and frameworks the same way
//! the `dotnet` host does. Calling into it is abstracted behind
//! [`HostLibraryLoader`] and [`HostLibrary`] so the call can be supplied by
//! an embedder. A loaded library is owned by one strategy run and released
//! when its box is dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{local_runtime_environment, DiscoveryContext, ProbeRequest};
use crate::discovery::find_global_json;
use crate::error::{LocatorError, Result};
use crate::model::{FrameworkInfo, HostInfo, InstallationInfo, SdkInfo, UNKNOWN_VERSION};
use crate::platform::{self, OsFamily};
use crate::version::{self, VersionKey};

/// An installed SDK as reported by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeSdk {
    pub version: String,
    pub path: PathBuf,
}

/// An installed framework as reported by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeFramework {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
}

/// Environment information as reported by the library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeEnvironmentInfo {
    pub host_version: String,
    pub host_commit: Option<String>,
    pub sdks: Vec<NativeSdk>,
    pub frameworks: Vec<NativeFramework>,
}

/// A loaded host resolution library.
///
/// Dropping the value unloads the library.
pub trait HostLibrary: Send {
    /// Enumerate the installation at `root`. Errors carry the library's
    /// non-zero status code.
    fn environment_info(&self, root: &Path) -> std::result::Result<NativeEnvironmentInfo, i32>;
}

/// Loads the host resolution library of an installation.
pub trait HostLibraryLoader: Send + Sync {
    fn load(&self, root: &Path) -> Result<Box<dyn HostLibrary>>;
}

/// Locates `hostfxr` in an installation.
///
/// This build has no dynamic loader, so a located library is reported as a
/// [`LocatorError::NativeLibraryLoad`] and discovery moves on to the next
/// strategy.
#[derive(Debug, Clone, Copy)]
pub struct HostFxrLoader {
    family: OsFamily,
}

impl HostFxrLoader {
    pub fn new(family: OsFamily) -> Self {
        Self { family }
    }
}

impl Default for HostFxrLoader {
    fn default() -> Self {
        Self::new(OsFamily::current())
    }
}

impl HostLibraryLoader for HostFxrLoader {
    fn load(&self, root: &Path) -> Result<Box<dyn HostLibrary>> {
        let fxr_dir = root.join("host").join("fxr");
        let path = locate_hostfxr(root, self.family).ok_or_else(|| {
            LocatorError::NativeLibraryLoad {
                path: fxr_dir,
                message: format!("{} not found", self.family.hostfxr_library_name()),
            }
        })?;

        Err(LocatorError::NativeLibraryLoad {
            path,
            message: "dynamic loading is not supported by this build".to_string(),
        })
    }
}

/// Path of the newest `hostfxr` library under `root/host/fxr`.
pub fn locate_hostfxr(root: &Path, family: OsFamily) -> Option<PathBuf> {
    let fxr_dir = root.join("host").join("fxr");
    let library = family.hostfxr_library_name();

    std::fs::read_dir(&fxr_dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            version::is_valid(&name).then_some((name, entry.path()))
        })
        .filter(|(_, dir)| dir.join(library).is_file())
        .max_by_key(|(name, _)| VersionKey::parse(name))
        .map(|(_, dir)| dir.join(library))
}

/// Asks the host resolution library.
pub struct NativeProbeStrategy {
    context: Arc<DiscoveryContext>,
    loader: Arc<dyn HostLibraryLoader>,
}

impl NativeProbeStrategy {
    pub fn new(context: Arc<DiscoveryContext>, loader: Arc<dyn HostLibraryLoader>) -> Self {
        Self { context, loader }
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
                message: "no installation to load the host library from".to_string(),
            })?;

        let library = self.loader.load(&root)?;
        let native = library
            .environment_info(&root)
            .map_err(|status| LocatorError::NativeCallFailed { status })?;
        drop(library);

        Ok(self.to_installation(root, native, request))
    }

    fn to_installation(
        &self,
        root: PathBuf,
        native: NativeEnvironmentInfo,
        request: &ProbeRequest,
    ) -> InstallationInfo {
        let sdks: Vec<SdkInfo> = native
            .sdks
            .into_iter()
            .map(|sdk| SdkInfo {
                version: sdk.version,
                path: sdk.path,
                commit: None,
            })
            .collect();
        let frameworks = native
            .frameworks
            .into_iter()
            .map(|fw| FrameworkInfo {
                name: fw.name,
                version: fw.version,
                path: fw.path,
                commit: None,
            })
            .collect();

        let host_version = if native.host_version.trim().is_empty() {
            UNKNOWN_VERSION.to_string()
        } else {
            native.host_version
        };
        let host = HostInfo {
            version: host_version,
            architecture: platform::current_architecture().to_string(),
            commit: native.host_commit,
            executable: root.join(self.context.family.executable_name()),
        };
        let runtime_environment = local_runtime_environment(&root, &sdks);

        InstallationInfo::new(
            root,
            host,
            runtime_environment,
            sdks,
            frameworks,
            find_global_json(&request.probing_dir),
        )
    }
}
