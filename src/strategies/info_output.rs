//! Parser for the `dotnet --info` report.
//!
//! The report is a sequence of sections. A section starts with a header
//! line at column zero ending in `:` and runs until the next blank line:
//!
//! ```text
//! .NET SDK:
//!  Version:   8.0.100
//!  Commit:    57efcf1350
//!
//! Runtime Environment:
//!  OS Name:     ubuntu
//!  RID:         linux-x64
//!
//! Host:
//!   Version:      8.0.0
//!   Architecture: x64
//!
//! .NET SDKs installed:
//!   8.0.100 [/usr/share/dotnet/sdk]
//!
//! .NET runtimes installed:
//!   Microsoft.NETCore.App 8.0.0 [/usr/share/dotnet/shared/Microsoft.NETCore.App]
//! ```
//!
//! Sections we do not know about are skipped.

use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::discovery::GlobalJson;
use crate::error::{LocatorError, Result};
use crate::model::{
    FrameworkInfo, HostInfo, InstallationInfo, RuntimeEnvironment, SdkInfo, UNKNOWN_VERSION,
};
use crate::platform;

static RE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^:]+?)\s*:\s*(.*?)\s*$").expect("label pattern is valid")
});

static RE_SDK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+)\s+\[(.+)\]\s*$").expect("sdk line pattern is valid")
});

static RE_FRAMEWORK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+)\s+(\S+)\s+\[(.+)\]\s*$").expect("framework line pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Host,
    Runtime,
    ActiveSdk,
    SdkList,
    FrameworkList,
    Ignored,
}

impl Section {
    fn from_header(header: &str) -> Self {
        let title = header.trim_end_matches(':').trim();
        let installed = title.contains("installed");

        if title.starts_with("Host") {
            Section::Host
        } else if title.starts_with("Runtime Environment") {
            Section::Runtime
        } else if title.starts_with(".NET") && title.contains("SDKs installed") {
            Section::SdkList
        } else if title.starts_with(".NET") && title.contains("runtimes installed") {
            Section::FrameworkList
        } else if title.starts_with(".NET") && title.contains("SDK") && !installed {
            Section::ActiveSdk
        } else {
            Section::Ignored
        }
    }
}

/// Everything recognized in one `--info` report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoOutput {
    pub host_version: Option<String>,
    pub host_architecture: Option<String>,
    pub host_commit: Option<String>,
    pub active_sdk_version: Option<String>,
    pub active_sdk_commit: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub rid: Option<String>,
    pub base_path: Option<PathBuf>,
    /// Other `key: value` lines of the runtime section.
    pub properties: BTreeMap<String, String>,
    pub sdks: Vec<SdkInfo>,
    pub frameworks: Vec<FrameworkInfo>,
}

/// Parse a report. Fails when nothing useful was recognized.
pub fn parse(output: &str) -> Result<InfoOutput> {
    let mut info = InfoOutput::default();
    let mut section = Section::None;

    for line in output.lines() {
        if line.trim().is_empty() {
            section = Section::None;
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        if !indented && line.trim_end().ends_with(':') {
            section = Section::from_header(line.trim_end());
            continue;
        }

        match section {
            Section::Host => info.host_line(line),
            Section::Runtime => info.runtime_line(line),
            Section::ActiveSdk => info.active_sdk_line(line),
            Section::SdkList => info.sdk_line(line),
            Section::FrameworkList => info.framework_line(line),
            Section::None | Section::Ignored => {}
        }
    }

    if info.host_version.is_none() && info.sdks.is_empty() && info.frameworks.is_empty() {
        return Err(LocatorError::Parse {
            what: "dotnet --info output".to_string(),
            message: "no host, SDK or runtime information found".to_string(),
        });
    }

    if let (Some(version), Some(commit)) = (&info.active_sdk_version, &info.active_sdk_commit) {
        for sdk in info.sdks.iter_mut().filter(|s| &s.version == version) {
            sdk.commit.get_or_insert_with(|| commit.clone());
        }
    }

    Ok(info)
}

fn label(line: &str) -> Option<(&str, &str)> {
    let caps = RE_LABEL.captures(line)?;
    let key = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str();
    Some((key, value))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl InfoOutput {
    fn host_line(&mut self, line: &str) {
        match label(line) {
            Some(("Version", v)) => self.host_version = non_empty(v),
            Some(("Architecture", v)) => self.host_architecture = non_empty(v),
            Some(("Commit", v)) => self.host_commit = non_empty(v),
            _ => {}
        }
    }

    fn runtime_line(&mut self, line: &str) {
        match label(line) {
            Some(("OS Name", v)) => self.os_name = non_empty(v),
            Some(("OS Version", v)) => self.os_version = non_empty(v),
            Some(("RID", v)) => self.rid = non_empty(v),
            Some(("Base Path", v)) => self.base_path = non_empty(v).map(PathBuf::from),
            Some((key, v)) => {
                self.properties.insert(key.to_string(), v.to_string());
            }
            None => {}
        }
    }

    fn active_sdk_line(&mut self, line: &str) {
        match label(line) {
            Some(("Version", v)) => self.active_sdk_version = non_empty(v),
            Some(("Commit", v)) => self.active_sdk_commit = non_empty(v),
            _ => {}
        }
    }

    fn sdk_line(&mut self, line: &str) {
        let Some(caps) = RE_SDK_LINE.captures(line) else {
            tracing::trace!(line, "unrecognized SDK line");
            return;
        };
        let version = caps[1].to_string();
        self.sdks.push(SdkInfo {
            path: Path::new(caps[2].trim()).join(&version),
            version,
            commit: None,
        });
    }

    fn framework_line(&mut self, line: &str) {
        let Some(caps) = RE_FRAMEWORK_LINE.captures(line) else {
            tracing::trace!(line, "unrecognized runtime line");
            return;
        };
        let version = caps[2].to_string();
        self.frameworks.push(FrameworkInfo {
            name: caps[1].to_string(),
            path: Path::new(caps[3].trim()).join(&version),
            version,
            commit: None,
        });
    }

    /// Turn the report into an installation description.
    ///
    /// Fields the report left out are filled from the local machine.
    pub fn into_installation(
        self,
        root: PathBuf,
        executable: PathBuf,
        global_json: Option<GlobalJson>,
    ) -> InstallationInfo {
        let os_description = match (&self.os_name, &self.os_version) {
            (Some(name), Some(version)) => format!("{} {}", name, version),
            (Some(name), None) => name.clone(),
            _ => platform::os_description(),
        };

        let base_path = self.base_path.clone().unwrap_or_else(|| {
            crate::model::sort_sdks(self.sdks.clone())
                .first()
                .map(|sdk| sdk.path.clone())
                .unwrap_or_else(|| root.clone())
        });

        let host = HostInfo {
            version: self
                .host_version
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            architecture: self
                .host_architecture
                .unwrap_or_else(|| platform::current_architecture().to_string()),
            commit: self.host_commit,
            executable,
        };

        let runtime_environment = RuntimeEnvironment {
            os_description,
            rid: self.rid.unwrap_or_else(platform::current_rid),
            base_path,
            properties: self.properties,
        };

        InstallationInfo::new(
            root,
            host,
            runtime_environment,
            self.sdks,
            self.frameworks,
            global_json,
        )
    }
}
