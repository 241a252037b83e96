//! Runtimes command implementation.

use crate::cli::args::RuntimesArgs;
use crate::error::Result;
use crate::model::{FrameworkInfo, InstallationInfo};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// The runtimes command implementation.
pub struct RuntimesCommand {
    info: InstallationInfo,
    args: RuntimesArgs,
    json: bool,
}

impl RuntimesCommand {
    pub fn new(info: InstallationInfo, args: RuntimesArgs, json: bool) -> Self {
        Self { info, args, json }
    }

    fn selected(&self) -> Vec<&FrameworkInfo> {
        match &self.args.name {
            Some(name) => self.info.frameworks_named(name).collect(),
            None => self.info.frameworks.iter().collect(),
        }
    }
}

impl Command for RuntimesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let frameworks = self.selected();

        if self.json {
            ui.data(&display::to_json(&frameworks)?);
            return Ok(CommandResult::success());
        }

        if frameworks.is_empty() {
            match &self.args.name {
                Some(name) => ui.warning(&format!("No {} runtimes found", name)),
                None => ui.warning(&format!("No runtimes found in {}", self.info.root.display())),
            }
            return Ok(CommandResult::success());
        }

        for framework in frameworks {
            ui.data(&display::framework_line(framework));
        }
        Ok(CommandResult::success())
    }
}
