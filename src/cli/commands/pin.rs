//! Pin command implementation.
//!
//! Reports the `global.json` that governs the probing directory.

use std::path::PathBuf;

use crate::discovery::find_global_json;
use crate::error::{LocatorError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// The pin command implementation.
pub struct PinCommand {
    probing_dir: Option<PathBuf>,
    json: bool,
}

impl PinCommand {
    pub fn new(probing_dir: Option<PathBuf>, json: bool) -> Self {
        Self { probing_dir, json }
    }
}

impl Command for PinCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let dir = self
            .probing_dir
            .as_deref()
            .ok_or_else(|| LocatorError::InvalidArgument {
                message: "current directory is unavailable".to_string(),
            })?;
        if !dir.is_dir() {
            return Err(LocatorError::InvalidArgument {
                message: format!("probing directory {} does not exist", dir.display()),
            });
        }

        let global_json = find_global_json(dir);

        if self.json {
            ui.data(&display::to_json(&global_json)?);
            return Ok(CommandResult::success());
        }

        match global_json {
            Some(global_json) => {
                ui.key_value("Path", &global_json.path.display().to_string());
                match &global_json.sdk_version {
                    Some(version) => ui.key_value("SDK version", version),
                    None => ui.warning("global.json does not pin an SDK version"),
                }
                if let Some(roll_forward) = &global_json.roll_forward {
                    ui.key_value("Roll forward", roll_forward);
                }
                if let Some(allow) = global_json.allow_prerelease {
                    ui.key_value("Prerelease", if allow { "allowed" } else { "not allowed" });
                }
            }
            None => ui.message(&format!("No global.json applies to {}", dir.display())),
        }

        Ok(CommandResult::success())
    }
}
