//! Environment variable and working-directory lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Read access to the process environment.
///
/// Discovery code never calls `std::env` directly; it goes through this
/// trait so tests can supply a fixed environment.
pub trait Environment: Send + Sync {
    /// Value of an environment variable, if set and valid Unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// The current working directory.
    fn current_dir(&self) -> Option<PathBuf>;

    /// The user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Value of a variable, treating an empty value as unset.
    fn non_empty_var(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.trim().is_empty())
    }

    /// `path` made absolute against [`current_dir`](Self::current_dir).
    fn resolve_path(&self, path: &Path) -> Option<PathBuf> {
        if path.is_absolute() {
            Some(path.to_path_buf())
        } else {
            self.current_dir().map(|cwd| cwd.join(path))
        }
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn current_dir(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.non_empty_var("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
    }
}

/// A fixed, in-memory environment.
///
/// Lookups are exact-match on the key. `HOME` doubles as the home
/// directory unless one is set explicitly.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
    current_dir: Option<PathBuf>,
    home_dir: Option<PathBuf>,
}

impl MapEnvironment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Set the current directory.
    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Set the home directory.
    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn current_dir(&self) -> Option<PathBuf> {
        self.current_dir.clone()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir
            .clone()
            .or_else(|| self.non_empty_var("HOME").map(PathBuf::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_environment_lookups() {
        let env = MapEnvironment::new()
            .with_var("DOTNET_ROOT", "/opt/dotnet")
            .with_current_dir("/work");
        assert_eq!(env.var("DOTNET_ROOT").as_deref(), Some("/opt/dotnet"));
        assert_eq!(env.var("PATH"), None);
        assert_eq!(env.current_dir(), Some(PathBuf::from("/work")));
    }

    #[test]
    fn map_environment_home_falls_back_to_home_var() {
        let env = MapEnvironment::new().with_var("HOME", "/home/dev");
        assert_eq!(env.home_dir(), Some(PathBuf::from("/home/dev")));

        let env = env.with_home_dir("/custom");
        assert_eq!(env.home_dir(), Some(PathBuf::from("/custom")));
    }

    #[test]
    fn non_empty_var_skips_blank_values() {
        let env = MapEnvironment::new().with_var("PATHEXT", "  ");
        assert_eq!(env.non_empty_var("PATHEXT"), None);
    }

    #[test]
    fn system_environment_has_current_dir() {
        assert!(SystemEnvironment.current_dir().is_some());
    }
}
