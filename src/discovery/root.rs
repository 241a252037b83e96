//! Locating the installation root.
//!
//! Precedence, first existing directory wins:
//! 1. `DOTNET_ROOT`
//! 2. The directory of the `dotnet` executable found on PATH
//! 3. Well-known install locations for the platform, accepted only when
//!    they contain the executable

use std::path::{Path, PathBuf};

use super::path::{normalize_path_entry, ExecutableResolver};
use crate::environment::Environment;
use crate::platform::OsFamily;

/// Environment variable that overrides root discovery.
pub const ROOT_OVERRIDE_VAR: &str = "DOTNET_ROOT";

/// Resolves the installation root for one environment.
pub struct RootDiscovery<'a> {
    env: &'a dyn Environment,
    family: OsFamily,
    resolver: ExecutableResolver<'a>,
    default_locations: Option<Vec<PathBuf>>,
}

impl<'a> RootDiscovery<'a> {
    /// Create a root discovery using the platform's default locations.
    pub fn new(env: &'a dyn Environment, family: OsFamily) -> Self {
        Self {
            env,
            family,
            resolver: ExecutableResolver::new(env, family),
            default_locations: None,
        }
    }

    /// Replace the resolver used for the PATH step.
    pub fn with_resolver(mut self, resolver: ExecutableResolver<'a>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the platform default install locations.
    pub fn with_default_locations(mut self, locations: Vec<PathBuf>) -> Self {
        self.default_locations = Some(locations);
        self
    }

    /// Discover the root directory.
    pub fn discover(&self) -> Option<PathBuf> {
        if let Some(root) = self.from_override() {
            tracing::debug!(root = %root.display(), "root from {}", ROOT_OVERRIDE_VAR);
            return Some(root);
        }

        if let Some(root) = self.from_executable() {
            tracing::debug!(root = %root.display(), "root from executable on PATH");
            return Some(root);
        }

        let root = self.from_default_locations();
        match &root {
            Some(root) => tracing::debug!(root = %root.display(), "root from default location"),
            None => tracing::debug!("no dotnet root found"),
        }
        root
    }

    fn from_override(&self) -> Option<PathBuf> {
        let raw = self.env.non_empty_var(ROOT_OVERRIDE_VAR)?;
        let path = normalize_path_entry(&raw, self.env, self.family)?;
        path.is_dir().then_some(path)
    }

    fn from_executable(&self) -> Option<PathBuf> {
        let executable = self.resolver.locate()?;
        executable_dir(&executable)
    }

    fn from_default_locations(&self) -> Option<PathBuf> {
        let defaults;
        let locations = match &self.default_locations {
            Some(locations) => locations,
            None => {
                defaults = default_locations(self.env, self.family);
                &defaults
            }
        };

        let executable = self.family.executable_name();
        locations
            .iter()
            .find(|dir| dir.is_dir() && dir.join(executable).is_file())
            .cloned()
    }
}

/// Directory containing an executable, following symlinks.
///
/// Package managers often put a `dotnet` symlink in `/usr/bin` that points
/// into the real installation.
pub fn executable_dir(executable: &Path) -> Option<PathBuf> {
    let resolved = std::fs::canonicalize(executable).unwrap_or_else(|_| executable.to_path_buf());
    let dir = resolved.parent()?;
    dir.is_dir().then(|| dir.to_path_buf())
}

/// Conventional install locations for a platform, in priority order.
pub fn default_locations(env: &dyn Environment, family: OsFamily) -> Vec<PathBuf> {
    let mut locations = Vec::new();

    match family {
        OsFamily::Windows => {
            for var in ["ProgramFiles", "ProgramFiles(x86)"] {
                if let Some(dir) = env.non_empty_var(var) {
                    locations.push(PathBuf::from(dir).join("dotnet"));
                }
            }
            locations.push(PathBuf::from(r"C:\Program Files\dotnet"));
        }
        OsFamily::Unix if cfg!(target_os = "macos") => {
            locations.push(PathBuf::from("/usr/local/share/dotnet"));
            locations.push(PathBuf::from("/usr/local/share/dotnet/x64"));
            locations.push(PathBuf::from("/opt/homebrew/opt/dotnet/libexec"));
        }
        OsFamily::Unix => {
            locations.push(PathBuf::from("/usr/share/dotnet"));
            locations.push(PathBuf::from("/usr/lib/dotnet"));
            locations.push(PathBuf::from("/usr/lib64/dotnet"));
            locations.push(PathBuf::from("/opt/dotnet"));
            locations.push(PathBuf::from("/snap/dotnet-sdk/current"));
        }
    }

    if family == OsFamily::Unix {
        if let Some(home) = env.home_dir() {
            locations.push(home.join(".dotnet"));
        }
    }

    let mut seen = std::collections::HashSet::new();
    locations.retain(|p| seen.insert(p.clone()));
    locations
}
