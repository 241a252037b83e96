//! Sdks command implementation.

use crate::cli::args::SdksArgs;
use crate::error::Result;
use crate::model::{InstallationInfo, SdkInfo};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// The sdks command implementation.
pub struct SdksCommand {
    info: InstallationInfo,
    args: SdksArgs,
    json: bool,
}

impl SdksCommand {
    pub fn new(info: InstallationInfo, args: SdksArgs, json: bool) -> Self {
        Self { info, args, json }
    }

    fn selected(&self) -> &[SdkInfo] {
        if self.args.latest {
            &self.info.sdks[..self.info.sdks.len().min(1)]
        } else {
            &self.info.sdks
        }
    }
}

impl Command for SdksCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let sdks = self.selected();

        if self.json {
            ui.data(&display::to_json(sdks)?);
            return Ok(CommandResult::success());
        }

        if sdks.is_empty() {
            ui.warning(&format!("No SDKs found in {}", self.info.root.display()));
            return Ok(CommandResult::success());
        }

        for sdk in sdks {
            ui.data(&display::sdk_line(sdk));
        }
        Ok(CommandResult::success())
    }
}
