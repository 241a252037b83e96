//! Root command implementation.
//!
//! Runs root discovery only: `DOTNET_ROOT`, then PATH, then the platform
//! default locations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{LocatorError, Result};
use crate::strategies::DiscoveryContext;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// The root command implementation.
pub struct RootCommand {
    root: Option<PathBuf>,
    json: bool,
}

impl RootCommand {
    /// Validate `explicit_root` or run root discovery.
    pub async fn discover(
        context: &Arc<DiscoveryContext>,
        explicit_root: Option<&Path>,
        json: bool,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let explicit_root = match explicit_root {
            Some(root) => {
                let root = context
                    .env
                    .resolve_path(root)
                    .unwrap_or_else(|| root.to_path_buf());
                if !root.is_dir() {
                    return Err(LocatorError::InvalidArgument {
                        message: format!("root {} is not a directory", root.display()),
                    });
                }
                Some(root)
            }
            None => None,
        };

        let root = context.resolve_root(explicit_root.as_deref(), cancel).await?;
        Ok(Self { root, json })
    }
}

impl Command for RootCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.json {
            ui.data(&display::to_json(&self.root)?);
            return Ok(CommandResult::success());
        }

        match &self.root {
            Some(root) => {
                ui.data(&root.display().to_string());
                Ok(CommandResult::success())
            }
            None => {
                ui.error("No dotnet installation found. Set DOTNET_ROOT or add dotnet to PATH.");
                Ok(CommandResult::failure(1))
            }
        }
    }
}
