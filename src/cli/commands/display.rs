//! Shared display helpers.
//!
//! SDK and runtime lines use the same `version [directory]` layout as
//! `dotnet --list-sdks` and `dotnet --list-runtimes`, so scripts written
//! against those commands keep working.

use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::model::{FrameworkInfo, SdkInfo};

/// `8.0.100 [/usr/share/dotnet/sdk]`
pub fn sdk_line(sdk: &SdkInfo) -> String {
    format!("{} [{}]", sdk.version, parent_display(&sdk.path))
}

/// `Microsoft.NETCore.App 8.0.0 [/usr/share/dotnet/shared/Microsoft.NETCore.App]`
pub fn framework_line(framework: &FrameworkInfo) -> String {
    format!(
        "{} {} [{}]",
        framework.name,
        framework.version,
        parent_display(&framework.path)
    )
}

fn parent_display(path: &Path) -> String {
    path.parent().unwrap_or(path).display().to_string()
}

/// Pretty-printed JSON for `--json` output.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| anyhow::Error::from(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn sdk_line_shows_containing_directory() {
        let sdk = SdkInfo {
            version: "8.0.100".to_string(),
            path: PathBuf::from("/usr/share/dotnet/sdk/8.0.100"),
            commit: None,
        };
        assert_eq!(sdk_line(&sdk), "8.0.100 [/usr/share/dotnet/sdk]");
    }

    #[test]
    fn framework_line_includes_name() {
        let framework = FrameworkInfo {
            name: "Microsoft.NETCore.App".to_string(),
            version: "8.0.0".to_string(),
            path: PathBuf::from("/usr/share/dotnet/shared/Microsoft.NETCore.App/8.0.0"),
            commit: None,
        };
        assert_eq!(
            framework_line(&framework),
            "Microsoft.NETCore.App 8.0.0 [/usr/share/dotnet/shared/Microsoft.NETCore.App]"
        );
    }

    #[test]
    fn to_json_pretty_prints() {
        let json = to_json(&vec!["a", "b"]).unwrap();
        assert!(json.contains("\n"));
        assert!(json.contains("\"a\""));
    }
}
