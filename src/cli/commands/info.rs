//! Info command implementation.
//!
//! The default `dotnet-locator info` report, laid out like `dotnet --info`.

use crate::error::Result;
use crate::model::InstallationInfo;
use crate::ui::{OutputMode, UserInterface};

use super::dispatcher::{Command, CommandResult};
use super::display;

/// The info command implementation.
pub struct InfoCommand {
    info: InstallationInfo,
    json: bool,
}

impl InfoCommand {
    pub fn new(info: InstallationInfo, json: bool) -> Self {
        Self { info, json }
    }
}

impl Command for InfoCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let info = &self.info;

        if self.json {
            ui.data(&display::to_json(info)?);
            return Ok(CommandResult::success());
        }

        if ui.output_mode() == OutputMode::Quiet {
            ui.data(&info.root.display().to_string());
            return Ok(CommandResult::success());
        }

        ui.show_header("Host:");
        ui.key_value("Version", &info.host.version);
        ui.key_value("Architecture", &info.host.architecture);
        if let Some(commit) = &info.host.commit {
            ui.key_value("Commit", commit);
        }
        ui.key_value("Executable", &info.host.executable.display().to_string());
        ui.key_value("Root", &info.root.display().to_string());
        ui.message("");

        let runtime = &info.runtime_environment;
        ui.show_header("Runtime Environment:");
        ui.key_value("OS", &runtime.os_description);
        ui.key_value("RID", &runtime.rid);
        ui.key_value("Base Path", &runtime.base_path.display().to_string());
        for (key, value) in &runtime.properties {
            ui.key_value(key, value);
        }
        ui.message("");

        ui.show_header("SDKs installed:");
        if info.sdks.is_empty() {
            ui.warning("No SDKs found");
        }
        for sdk in &info.sdks {
            ui.message(&format!("  {}", display::sdk_line(sdk)));
        }
        ui.message("");

        ui.show_header("Runtimes installed:");
        if info.frameworks.is_empty() {
            ui.warning("No runtimes found");
        }
        for framework in &info.frameworks {
            ui.message(&format!("  {}", display::framework_line(framework)));
        }
        ui.message("");

        ui.show_header("global.json file:");
        match &info.global_json {
            Some(global_json) => {
                ui.key_value("Path", &global_json.path.display().to_string());
                if let Some(version) = &global_json.sdk_version {
                    ui.key_value("SDK version", version);
                    match info.sdk(version) {
                        Some(_) => ui.success(&format!("Pinned SDK {} is installed", version)),
                        None => ui.warning(&format!("Pinned SDK {} is not installed", version)),
                    }
                }
            }
            None => ui.message("  Not found"),
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::GlobalJson;
    use crate::model::{HostInfo, RuntimeEnvironment, SdkInfo};
    use crate::ui::MockUI;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn installation(global_json: Option<GlobalJson>) -> InstallationInfo {
        InstallationInfo::new(
            PathBuf::from("/usr/share/dotnet"),
            HostInfo {
                version: "8.0.0".to_string(),
                architecture: "x64".to_string(),
                commit: None,
                executable: PathBuf::from("/usr/share/dotnet/dotnet"),
            },
            RuntimeEnvironment {
                os_description: "ubuntu 22.04".to_string(),
                rid: "linux-x64".to_string(),
                base_path: PathBuf::from("/usr/share/dotnet/sdk/8.0.100"),
                properties: BTreeMap::new(),
            },
            vec![SdkInfo {
                version: "8.0.100".to_string(),
                path: PathBuf::from("/usr/share/dotnet/sdk/8.0.100"),
                commit: None,
            }],
            vec![],
            global_json,
        )
    }

    #[test]
    fn shows_host_and_sdks() {
        let mut ui = MockUI::new();
        InfoCommand::new(installation(None), false)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(ui.value_of("Version"), Some("8.0.0"));
        assert_eq!(ui.value_of("RID"), Some("linux-x64"));
        assert!(ui.has_message("8.0.100 [/usr/share/dotnet/sdk]"));
        assert!(ui.has_warning("No runtimes found"));
        assert!(ui.has_message("Not found"));
    }

    #[test]
    fn warns_about_missing_pinned_sdk() {
        let mut ui = MockUI::new();
        let pin = GlobalJson {
            path: PathBuf::from("/src/app/global.json"),
            sdk_version: Some("6.0.100".to_string()),
            roll_forward: None,
            allow_prerelease: None,
        };
        InfoCommand::new(installation(Some(pin)), false)
            .execute(&mut ui)
            .unwrap();
        assert!(ui.has_warning("Pinned SDK 6.0.100 is not installed"));
        assert!(ui.successes().is_empty());
    }

    #[test]
    fn confirms_installed_pinned_sdk() {
        let mut ui = MockUI::new();
        let pin = GlobalJson {
            path: PathBuf::from("/src/app/global.json"),
            sdk_version: Some("8.0.100".to_string()),
            roll_forward: Some("latestFeature".to_string()),
            allow_prerelease: None,
        };
        InfoCommand::new(installation(Some(pin)), false)
            .execute(&mut ui)
            .unwrap();
        assert_eq!(ui.successes(), ["Pinned SDK 8.0.100 is installed"]);
        assert!(ui.warnings().iter().all(|w| !w.contains("Pinned")));
    }

    #[test]
    fn json_output_is_data_only() {
        let mut ui = MockUI::new();
        InfoCommand::new(installation(None), true)
            .execute(&mut ui)
            .unwrap();

        assert!(ui.headers().is_empty());
        let value: serde_json::Value = serde_json::from_str(&ui.data_lines()[0]).unwrap();
        assert_eq!(value["host"]["version"], "8.0.0");
        assert_eq!(value["sdks"][0]["version"], "8.0.100");
    }

    #[test]
    fn quiet_mode_prints_root() {
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        InfoCommand::new(installation(None), false)
            .execute(&mut ui)
            .unwrap();
        assert_eq!(ui.data_lines(), &["/usr/share/dotnet".to_string()]);
    }
}
