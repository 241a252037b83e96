//! Strategy orchestration.
//!
//! [`Locator::get_installation_info`] validates its inputs, then tries the
//! native, filesystem and process strategies in that order and returns the
//! first success. A strategy that panics is recorded and skipped.

use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::environment::{Environment, SystemEnvironment};
use crate::error::{LocatorError, Result, StrategyFault};
use crate::model::InstallationInfo;
use crate::platform::OsFamily;
use crate::strategies::{
    DiscoveryContext, FilesystemScanStrategy, HostFxrLoader, HostLibraryLoader,
    NativeProbeStrategy, ProbeRequest, ProcessStrategy, Strategy,
};

/// Entry point for toolchain discovery.
///
/// A `Locator` is immutable configuration; every call builds fresh
/// strategies, so one instance can serve concurrent calls.
///
/// ```no_run
/// # async fn example() -> dotnet_locator::Result<()> {
/// use dotnet_locator::Locator;
/// use tokio_util::sync::CancellationToken;
///
/// let info = Locator::new()
///     .get_installation_info(None, None, &CancellationToken::new())
///     .await?;
/// if let Some(sdk) = info.latest_sdk() {
///     println!("{} at {}", sdk.version, sdk.path.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Locator {
    env: Arc<dyn Environment>,
    family: OsFamily,
    native_loader: Arc<dyn HostLibraryLoader>,
    default_roots: Option<Vec<PathBuf>>,
    system_search: bool,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator {
    /// A locator for the current process environment and platform.
    pub fn new() -> Self {
        let family = OsFamily::current();
        Self {
            env: Arc::new(SystemEnvironment),
            family,
            native_loader: Arc::new(HostFxrLoader::new(family)),
            default_roots: None,
            system_search: true,
        }
    }

    pub fn with_environment(mut self, env: Arc<dyn Environment>) -> Self {
        self.env = env;
        self
    }

    /// Apply another OS family's naming and PATH rules.
    pub fn with_os_family(mut self, family: OsFamily) -> Self {
        self.family = family;
        self
    }

    pub fn with_native_loader(mut self, loader: Arc<dyn HostLibraryLoader>) -> Self {
        self.native_loader = loader;
        self
    }

    /// Replace the platform default install locations.
    pub fn with_default_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.default_roots = Some(roots);
        self
    }

    /// Enable or disable asking the OS lookup tools for `dotnet`.
    pub fn with_system_search(mut self, enabled: bool) -> Self {
        self.system_search = enabled;
        self
    }

    /// Settings shared by the strategies of one call.
    pub fn context(&self) -> Arc<DiscoveryContext> {
        Arc::new(DiscoveryContext {
            env: Arc::clone(&self.env),
            family: self.family,
            system_search: self.system_search,
            default_roots: self.default_roots.clone(),
        })
    }

    /// Fresh strategy instances in the order they are tried.
    pub fn strategies(&self) -> Vec<Strategy> {
        let context = self.context();
        vec![
            Strategy::Native(NativeProbeStrategy::new(
                Arc::clone(&context),
                Arc::clone(&self.native_loader),
            )),
            Strategy::Filesystem(FilesystemScanStrategy::new(Arc::clone(&context))),
            Strategy::Process(ProcessStrategy::new(context)),
        ]
    }

    /// Discover the installation that applies to `probing_dir`.
    ///
    /// `probing_dir` defaults to the current directory. When `explicit_root`
    /// is given, no root discovery happens and the root must contain the
    /// `dotnet` executable.
    pub async fn get_installation_info(
        &self,
        probing_dir: Option<&Path>,
        explicit_root: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Result<InstallationInfo> {
        if cancel.is_cancelled() {
            return Err(LocatorError::Cancelled);
        }

        let request = self.prepare(probing_dir, explicit_root)?;
        let mut last_failure = None;
        let mut last_fault = None;

        for strategy in self.strategies() {
            if cancel.is_cancelled() {
                return Err(LocatorError::Cancelled);
            }

            let name = strategy.name();
            tracing::debug!(strategy = name, "trying strategy");

            match AssertUnwindSafe(strategy.run(&request, cancel))
                .catch_unwind()
                .await
            {
                Ok(Ok(info)) => {
                    tracing::debug!(strategy = name, root = %info.root.display(), "strategy succeeded");
                    return Ok(info);
                }
                Ok(Err(e)) if e.is_cancelled() => return Err(e),
                Ok(Err(e)) => {
                    tracing::debug!(strategy = name, error = %e, "strategy failed");
                    last_failure = Some(e);
                }
                Err(payload) => {
                    let fault = StrategyFault::from_panic(name, payload);
                    tracing::warn!("{}", fault);
                    last_fault = Some(fault);
                }
            }
        }

        Err(conclude(last_failure, last_fault))
    }

    fn prepare(
        &self,
        probing_dir: Option<&Path>,
        explicit_root: Option<&Path>,
    ) -> Result<ProbeRequest> {
        let probing_dir = match probing_dir {
            Some(dir) => self.resolve(dir)?,
            None => self
                .env
                .current_dir()
                .ok_or_else(|| LocatorError::InvalidArgument {
                    message: "current directory is unavailable".to_string(),
                })?,
        };
        if !probing_dir.is_dir() {
            return Err(LocatorError::InvalidArgument {
                message: format!("probing directory {} does not exist", probing_dir.display()),
            });
        }

        let explicit_root = match explicit_root {
            Some(root) => {
                let root = self.resolve(root)?;
                if !root.is_dir() {
                    return Err(LocatorError::InvalidArgument {
                        message: format!("root {} is not a directory", root.display()),
                    });
                }
                let executable = self.family.executable_name();
                if !root.join(executable).is_file() {
                    return Err(LocatorError::ExecutableNotFound {
                        message: format!("{} does not contain {}", root.display(), executable),
                    });
                }
                Some(root)
            }
            None => None,
        };

        Ok(ProbeRequest {
            probing_dir,
            explicit_root,
        })
    }

    /// Relative paths are taken from the environment's current directory.
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        self.env
            .resolve_path(path)
            .ok_or_else(|| LocatorError::InvalidArgument {
                message: format!(
                    "cannot resolve {} without a current directory",
                    path.display()
                ),
            })
    }
}

/// Error reported when every strategy failed.
fn conclude(last_failure: Option<LocatorError>, last_fault: Option<StrategyFault>) -> LocatorError {
    match (last_failure, last_fault) {
        (Some(failure), _) => failure,
        (None, Some(fault)) => LocatorError::AllStrategiesFailed {
            message: format!("all discovery strategies failed; last fault: {}", fault),
            fault: Some(fault),
        },
        (None, None) => LocatorError::AllStrategiesFailed {
            message: "all discovery strategies failed".to_string(),
            fault: None,
        },
    }
}

/// Discover the installation with a default [`Locator`].
pub async fn get_installation_info(
    probing_dir: Option<&Path>,
    explicit_root: Option<&Path>,
    cancel: &CancellationToken,
) -> Result<InstallationInfo> {
    Locator::new()
        .get_installation_info(probing_dir, explicit_root, cancel)
        .await
}
