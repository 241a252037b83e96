//! Discovery strategies.
//!
//! Each strategy produces a complete [`InstallationInfo`] on its own or
//! fails; the [`Locator`](crate::Locator) tries them in a fixed order.
//!
//! - [`native`] - Asks the host resolution library
//! - [`filesystem`] - Scans the installation directory layout
//! - [`process`] - Runs `dotnet --info` and parses its report

pub mod filesystem;
pub mod info_output;
pub mod native;
pub mod process;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::discovery::{ExecutableResolver, RootDiscovery};
use crate::environment::Environment;
use crate::error::{LocatorError, Result};
use crate::model::{InstallationInfo, RuntimeEnvironment, SdkInfo};
use crate::platform::{self, OsFamily};
use crate::version::VersionKey;

pub use filesystem::FilesystemScanStrategy;
pub use native::{HostFxrLoader, HostLibrary, HostLibraryLoader, NativeProbeStrategy};
pub use process::ProcessStrategy;

/// Shared, read-only settings the strategies discover with.
pub struct DiscoveryContext {
    pub env: Arc<dyn Environment>,
    pub family: OsFamily,
    /// Whether the resolver may fall back to OS lookup tools.
    pub system_search: bool,
    /// Replacement for the platform default install locations.
    pub default_roots: Option<Vec<PathBuf>>,
}

impl DiscoveryContext {
    pub fn resolver(&self) -> ExecutableResolver<'_> {
        ExecutableResolver::new(&*self.env, self.family).with_system_search(self.system_search)
    }

    fn root_discovery_with<'a>(&'a self, resolver: ExecutableResolver<'a>) -> RootDiscovery<'a> {
        let discovery = RootDiscovery::new(&*self.env, self.family).with_resolver(resolver);
        match &self.default_roots {
            Some(roots) => discovery.with_default_locations(roots.clone()),
            None => discovery,
        }
    }

    /// The explicit root when given, otherwise the discovered one.
    pub async fn resolve_root(
        self: &Arc<Self>,
        explicit: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Result<Option<PathBuf>> {
        if let Some(root) = explicit {
            return Ok(Some(root.to_path_buf()));
        }
        self.off_runtime(cancel, |context, token| {
            context
                .root_discovery_with(context.resolver().with_cancellation(token))
                .discover()
        })
        .await
    }

    /// Locate the `dotnet` executable through PATH and the lookup tools.
    pub async fn locate_executable(
        self: &Arc<Self>,
        cancel: &CancellationToken,
    ) -> Result<Option<PathBuf>> {
        self.off_runtime(cancel, |context, token| {
            context.resolver().with_cancellation(token).locate()
        })
        .await
    }

    /// Run filesystem probing and lookup commands on the blocking pool.
    ///
    /// Returns [`LocatorError::Cancelled`] as soon as `cancel` fires; lookup
    /// commands still running observe the same token and are killed.
    async fn off_runtime<T, F>(self: &Arc<Self>, cancel: &CancellationToken, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&DiscoveryContext, CancellationToken) -> T + Send + 'static,
    {
        if cancel.is_cancelled() {
            return Err(LocatorError::Cancelled);
        }

        let context = Arc::clone(self);
        let token = cancel.clone();
        let task = tokio::task::spawn_blocking(move || work(&*context, token));

        tokio::select! {
            joined = task => match joined {
                Ok(value) => Ok(value),
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => Err(anyhow::Error::from(e).into()),
            },
            () = cancel.cancelled() => Err(LocatorError::Cancelled),
        }
    }
}

/// Inputs of one discovery call, already validated.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    /// Absolute directory the `global.json` walk and `--info` run from.
    pub probing_dir: PathBuf,
    /// Absolute root that must be used instead of discovery.
    pub explicit_root: Option<PathBuf>,
}

/// One discovery approach.
pub enum Strategy {
    Native(NativeProbeStrategy),
    Filesystem(FilesystemScanStrategy),
    Process(ProcessStrategy),
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Native(_) => "native",
            Strategy::Filesystem(_) => "filesystem",
            Strategy::Process(_) => "process",
        }
    }

    /// Run the strategy to completion.
    pub async fn run(
        &self,
        request: &ProbeRequest,
        cancel: &CancellationToken,
    ) -> Result<InstallationInfo> {
        match self {
            Strategy::Native(strategy) => strategy.run(request, cancel).await,
            Strategy::Filesystem(strategy) => strategy.run(request, cancel).await,
            Strategy::Process(strategy) => strategy.run(request, cancel).await,
        }
    }
}

/// Runtime environment of this machine, for strategies that do not get one
/// reported by the toolchain.
pub(crate) fn local_runtime_environment(root: &Path, sdks: &[SdkInfo]) -> RuntimeEnvironment {
    let base_path = sdks
        .iter()
        .max_by_key(|sdk| VersionKey::parse(&sdk.version))
        .map(|sdk| sdk.path.clone())
        .unwrap_or_else(|| root.to_path_buf());

    let mut properties = std::collections::BTreeMap::new();
    properties.insert("OS Platform".to_string(), platform::os_platform().to_string());

    RuntimeEnvironment {
        os_description: platform::os_description(),
        rid: platform::current_rid(),
        base_path,
        properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MapEnvironment;

    fn sdk(version: &str) -> SdkInfo {
        SdkInfo {
            version: version.to_string(),
            path: PathBuf::from("/dotnet/sdk").join(version),
            commit: None,
        }
    }

    #[test]
    fn runtime_base_path_is_latest_sdk() {
        let env = local_runtime_environment(
            Path::new("/dotnet"),
            &[sdk("7.0.400"), sdk("8.0.100"), sdk("8.0.100-rc.1")],
        );
        assert_eq!(env.base_path, PathBuf::from("/dotnet/sdk/8.0.100"));
        assert_eq!(env.rid, platform::current_rid());
        assert!(env.properties.contains_key("OS Platform"));
    }

    #[test]
    fn runtime_base_path_falls_back_to_root() {
        let env = local_runtime_environment(Path::new("/dotnet"), &[]);
        assert_eq!(env.base_path, PathBuf::from("/dotnet"));
    }

    fn isolated_context(env: MapEnvironment) -> Arc<DiscoveryContext> {
        Arc::new(DiscoveryContext {
            env: Arc::new(env),
            family: OsFamily::current(),
            system_search: false,
            default_roots: Some(vec![]),
        })
    }

    #[tokio::test]
    async fn explicit_root_skips_discovery() {
        let context = isolated_context(MapEnvironment::new());
        let cancel = CancellationToken::new();
        assert_eq!(
            context
                .resolve_root(Some(Path::new("/opt/dotnet")), &cancel)
                .await
                .unwrap(),
            Some(PathBuf::from("/opt/dotnet"))
        );
        assert_eq!(context.resolve_root(None, &cancel).await.unwrap(), None);
    }

    #[tokio::test]
    async fn discovery_runs_off_the_runtime() {
        let temp = tempfile::TempDir::new().unwrap();
        let env = MapEnvironment::new()
            .with_var(crate::discovery::ROOT_OVERRIDE_VAR, temp.path().to_string_lossy());
        let root = isolated_context(env)
            .resolve_root(None, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(root, Some(temp.path().to_path_buf()));
    }

    #[tokio::test]
    async fn cancelled_lookup_returns_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = isolated_context(MapEnvironment::new())
            .locate_executable(&cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
