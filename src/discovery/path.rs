//! Locating the `dotnet` executable through PATH.
//!
//! The resolver scans PATH itself rather than relying on `which`: the
//! quoting, extension and expansion rules differ between Windows and Unix,
//! and a login shell's view of PATH is not necessarily ours. Only when the
//! scan finds nothing do we ask the operating system's own lookup tools.
//!
//! # Example
//!
//! ```
//! use dotnet_locator::discovery::ExecutableResolver;
//! use dotnet_locator::environment::MapEnvironment;
//! use dotnet_locator::platform::OsFamily;
//!
//! let env = MapEnvironment::new().with_var("PATH", "");
//! let resolver = ExecutableResolver::new(&env, OsFamily::Unix).with_system_search(false);
//! assert!(resolver.locate().is_none());
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use crate::environment::{expand_home, expand_vars, Environment};
use crate::platform::{OsFamily, DOTNET_BASE_NAME};
use crate::shell::first_output_line;

/// Extensions tried on Windows when `PATHEXT` is unset or empty.
pub const DEFAULT_PATHEXT: &str = ".COM;.EXE;.BAT;.CMD";

/// Finds the `dotnet` executable for one environment and OS family.
pub struct ExecutableResolver<'a> {
    env: &'a dyn Environment,
    family: OsFamily,
    system_search: bool,
    cancel: Option<CancellationToken>,
}

impl<'a> ExecutableResolver<'a> {
    /// Create a resolver. System search fallbacks are enabled.
    pub fn new(env: &'a dyn Environment, family: OsFamily) -> Self {
        Self {
            env,
            family,
            system_search: true,
            cancel: None,
        }
    }

    /// Enable or disable the fallbacks that ask the OS lookup tools.
    pub fn with_system_search(mut self, enabled: bool) -> Self {
        self.system_search = enabled;
        self
    }

    /// Kill lookup commands and give up on them once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Locate the executable: PATH scan first, then system lookup tools.
    pub fn locate(&self) -> Option<PathBuf> {
        if let Some(found) = self.locate_on_path() {
            tracing::debug!(path = %found.display(), "found dotnet on PATH");
            return Some(found);
        }

        if !self.system_search {
            return None;
        }

        let found = self.locate_with_system_search();
        if let Some(path) = &found {
            tracing::debug!(path = %path.display(), "found dotnet through system lookup");
        }
        found
    }

    /// Scan the PATH variable only.
    pub fn locate_on_path(&self) -> Option<PathBuf> {
        let candidates = self.candidate_names();
        self.path_entries()
            .into_iter()
            .filter(|dir| dir.is_dir())
            .find_map(|dir| {
                candidates.iter().map(|name| dir.join(name)).find(|candidate| {
                    candidate.is_file() && self.passes_permission_check(candidate)
                })
            })
    }

    /// Normalized PATH entries in order, without existence filtering.
    pub fn path_entries(&self) -> Vec<PathBuf> {
        let raw = self.env.var("PATH").unwrap_or_default();
        split_path_list(&raw, self.family)
            .iter()
            .filter_map(|entry| normalize_path_entry(entry, self.env, self.family))
            .collect()
    }

    /// File names to try in each PATH directory, in order.
    pub fn candidate_names(&self) -> Vec<String> {
        if !self.family.requires_extensions() {
            return vec![DOTNET_BASE_NAME.to_string()];
        }

        let pathext = self
            .env
            .non_empty_var("PATHEXT")
            .unwrap_or_else(|| DEFAULT_PATHEXT.to_string());

        let mut seen = HashSet::new();
        let mut names = Vec::new();
        let with_extensions = std::iter::once(self.family.executable_name().to_string()).chain(
            pathext
                .split(';')
                .map(str::trim)
                .filter(|ext| !ext.is_empty())
                .map(|ext| format!("{}{}", DOTNET_BASE_NAME, ext)),
        );
        for name in with_extensions {
            if seen.insert(name.to_ascii_lowercase()) {
                names.push(name);
            }
        }
        if seen.insert(DOTNET_BASE_NAME.to_string()) {
            names.push(DOTNET_BASE_NAME.to_string());
        }
        names
    }

    fn passes_permission_check(&self, path: &Path) -> bool {
        self.family.requires_extensions() || is_executable(path)
    }

    /// Ask the operating system's lookup facilities.
    fn locate_with_system_search(&self) -> Option<PathBuf> {
        let accept = |line: String| {
            let path = normalize_path_entry(&line, self.env, self.family)?;
            path.is_file().then_some(path)
        };

        let cancel = self.cancel.as_ref();
        let lookup = |program: &str, args: &[&str]| {
            first_output_line(program, args, cancel).and_then(&accept)
        };

        match self.family {
            OsFamily::Windows => native_search()
                .and_then(&accept)
                .or_else(|| lookup("where", &[DOTNET_BASE_NAME])),
            OsFamily::Unix => lookup("sh", &["-c", "command -v dotnet"])
                .or_else(|| lookup("which", &[DOTNET_BASE_NAME])),
        }
    }
}

#[cfg(windows)]
fn native_search() -> Option<String> {
    which::which(DOTNET_BASE_NAME)
        .ok()
        .map(|p| p.to_string_lossy().into_owned())
}

#[cfg(not(windows))]
fn native_search() -> Option<String> {
    None
}

/// Split a PATH value into raw entries.
///
/// On Windows a separator inside double quotes does not split:
/// `"C:\a;b";C:\c` yields `"C:\a;b"` and `C:\c`.
pub fn split_path_list(value: &str, family: OsFamily) -> Vec<String> {
    let separator = family.path_list_separator();

    if family != OsFamily::Windows {
        return value.split(separator).map(str::to_string).collect();
    }

    let mut entries = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in value.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            c if c == separator && !in_quotes => entries.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    entries.push(current);
    entries
}

/// Normalize one raw PATH entry into an absolute path.
///
/// Trims whitespace, strips one pair of surrounding quotes, expands
/// variables and (on Unix) a leading `~`, and resolves relative entries
/// against the current directory. Returns `None` for entries that end up
/// empty or cannot be made absolute.
pub fn normalize_path_entry(
    raw: &str,
    env: &dyn Environment,
    family: OsFamily,
) -> Option<PathBuf> {
    let trimmed = strip_quotes(raw.trim()).trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut expanded = expand_vars(trimmed, env, family);
    if family.expands_home_shorthand() {
        expanded = expand_home(&expanded, env);
    }
    let expanded = expanded.trim();
    if expanded.is_empty() {
        return None;
    }

    if family.is_rooted(expanded) {
        Some(PathBuf::from(expanded))
    } else {
        env.current_dir().map(|cwd| cwd.join(expanded))
    }
}

fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}

/// Check whether a file has any executable permission bit set.
///
/// A failed permission check counts as executable.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(true)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}
