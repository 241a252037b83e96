//! Platform-specific naming and path rules.
//!
//! Discovery logic takes an [`OsFamily`] value instead of branching on
//! `cfg!` directly, so Windows PATH rules can be exercised on any host.

use std::path::Path;

/// Base name of the toolchain entry point.
pub const DOTNET_BASE_NAME: &str = "dotnet";

/// Operating system family whose PATH and naming rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Unix,
    Windows,
}

impl OsFamily {
    /// The family of the host this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }

    /// Separator between entries of the PATH variable.
    pub fn path_list_separator(self) -> char {
        match self {
            OsFamily::Unix => ':',
            OsFamily::Windows => ';',
        }
    }

    /// File name of the `dotnet` executable.
    pub fn executable_name(self) -> &'static str {
        match self {
            OsFamily::Unix => DOTNET_BASE_NAME,
            OsFamily::Windows => "dotnet.exe",
        }
    }

    /// Whether executables are found by file extension (`PATHEXT`).
    pub fn requires_extensions(self) -> bool {
        self == OsFamily::Windows
    }

    /// Whether a leading `~` in a PATH entry means the home directory.
    pub fn expands_home_shorthand(self) -> bool {
        self == OsFamily::Unix
    }

    /// File name of the native host resolution library.
    pub fn hostfxr_library_name(self) -> &'static str {
        match self {
            OsFamily::Windows => "hostfxr.dll",
            OsFamily::Unix if cfg!(target_os = "macos") => "libhostfxr.dylib",
            OsFamily::Unix => "libhostfxr.so",
        }
    }

    /// Whether a path string is rooted under this family's rules.
    ///
    /// Windows accepts drive-qualified paths (`C:\`), UNC paths and
    /// paths starting with a separator.
    pub fn is_rooted(self, path: &str) -> bool {
        match self {
            OsFamily::Unix => path.starts_with('/'),
            OsFamily::Windows => {
                let bytes = path.as_bytes();
                path.starts_with('\\')
                    || path.starts_with('/')
                    || (bytes.len() >= 3
                        && bytes[0].is_ascii_alphabetic()
                        && bytes[1] == b':'
                        && (bytes[2] == b'\\' || bytes[2] == b'/'))
                    || Path::new(path).is_absolute()
            }
        }
    }
}

/// Architecture name in the .NET vocabulary (`x64`, `arm64`, ...).
pub fn current_architecture() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "x86",
        "arm" => "arm",
        "s390x" => "s390x",
        "powerpc64" => "ppc64le",
        "loongarch64" => "loongarch64",
        "riscv64" => "riscv64",
        other => other,
    }
}

/// Runtime identifier for the current host (`linux-x64`, `osx-arm64`, ...).
pub fn current_rid() -> String {
    let os = match std::env::consts::OS {
        "windows" => "win",
        "macos" => "osx",
        "linux" if cfg!(target_env = "musl") => "linux-musl",
        other => other,
    };
    format!("{}-{}", os, current_architecture())
}

/// Short description of the host operating system.
pub fn os_description() -> String {
    format!("{} ({})", os_platform(), std::env::consts::FAMILY)
}

/// Platform name as `dotnet --info` reports it under `OS Platform`.
pub fn os_platform() -> &'static str {
    match std::env::consts::OS {
        "windows" => "Windows",
        "macos" => "Darwin",
        "linux" => "Linux",
        "freebsd" => "FreeBSD",
        _ => "Unknown",
    }
}
