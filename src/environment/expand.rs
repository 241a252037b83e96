//! Environment variable reference expansion.
//!
//! Windows PATH entries may contain `%VAR%` references and Unix entries may
//! contain `$VAR` or `${VAR}`. References to unset variables are left as
//! written.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::Environment;
use crate::platform::OsFamily;

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

lazy_regex!(RE_WINDOWS_VAR, r"%([^%]+)%");
lazy_regex!(
    RE_UNIX_VAR,
    r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)"
);

/// Expand variable references in `input` using `env`.
pub fn expand_vars(input: &str, env: &dyn Environment, family: OsFamily) -> String {
    if !input.contains(['%', '$']) {
        return input.to_string();
    }

    match family {
        OsFamily::Windows => RE_WINDOWS_VAR
            .replace_all(input, |caps: &Captures| {
                env.var(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned(),
        OsFamily::Unix => RE_UNIX_VAR
            .replace_all(input, |caps: &Captures| {
                let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                env.var(name).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned(),
    }
}

/// Expand a leading `~` (alone or followed by `/`) to the home directory.
pub fn expand_home(input: &str, env: &dyn Environment) -> String {
    let rest = match input.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return input.to_string(),
    };

    match env.home_dir() {
        Some(home) => format!("{}{}", home.to_string_lossy().trim_end_matches('/'), rest),
        None => input.to_string(),
    }
}
