//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::model::InstallationInfo;
use crate::ui::UserInterface;
use crate::Locator;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
/// Discovery happens before a command is built, so execution is synchronous.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    locator: Locator,
    probe_dir: Option<PathBuf>,
    root: Option<PathBuf>,
    json: bool,
}

impl CommandDispatcher {
    /// Create a dispatcher from the global CLI options.
    pub fn new(locator: Locator, cli: &Cli) -> Self {
        Self {
            locator,
            probe_dir: cli.probe_dir.clone(),
            root: cli.root.clone(),
            json: cli.json,
        }
    }

    async fn installation(&self, cancel: &CancellationToken) -> Result<InstallationInfo> {
        self.locator
            .get_installation_info(self.probe_dir.as_deref(), self.root.as_deref(), cancel)
            .await
    }

    fn probing_dir(&self) -> Option<PathBuf> {
        let env = self.locator.context().env.clone();
        match &self.probe_dir {
            Some(dir) => env.resolve_path(dir),
            None => env.current_dir(),
        }
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub async fn dispatch(
        &self,
        cli: &Cli,
        ui: &mut dyn UserInterface,
        cancel: &CancellationToken,
    ) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Info) | None => {
                let info = self.installation(cancel).await?;
                super::info::InfoCommand::new(info, self.json).execute(ui)
            }
            Some(Commands::Sdks(args)) => {
                let info = self.installation(cancel).await?;
                super::sdks::SdksCommand::new(info, args.clone(), self.json).execute(ui)
            }
            Some(Commands::Runtimes(args)) => {
                let info = self.installation(cancel).await?;
                super::runtimes::RuntimesCommand::new(info, args.clone(), self.json).execute(ui)
            }
            Some(Commands::Root) => {
                let cmd = super::root::RootCommand::discover(
                    &self.locator.context(),
                    self.root.as_deref(),
                    self.json,
                    cancel,
                )
                .await?;
                cmd.execute(ui)
            }
            Some(Commands::Pin) => {
                let cmd = super::pin::PinCommand::new(self.probing_dir(), self.json);
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::MapEnvironment;
    use crate::ui::MockUI;
    use clap::Parser;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn dispatcher(args: &[&str], env: MapEnvironment) -> (CommandDispatcher, Cli) {
        let cli = Cli::try_parse_from(args).unwrap();
        let locator = Locator::new()
            .with_environment(Arc::new(env))
            .with_default_roots(vec![])
            .with_system_search(false);
        (CommandDispatcher::new(locator, &cli), cli)
    }

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[tokio::test]
    async fn default_command_reports_installation() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("sdk/8.0.100/Sdks")).unwrap();
        fs::write(temp.path().join(crate::platform::OsFamily::current().executable_name()), "")
            .unwrap();
        let root = temp.path().to_string_lossy().to_string();

        let (dispatcher, cli) = dispatcher(
            &["dotnet-locator", "--root", &root, "--probe-dir", &root],
            MapEnvironment::new(),
        );
        let mut ui = MockUI::new();
        let result = dispatcher
            .dispatch(&cli, &mut ui, &CancellationToken::new())
            .await
            .unwrap();

        assert!(result.success);
        assert!(ui.has_message("8.0.100"));
    }

    #[tokio::test]
    async fn discovery_failure_propagates() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_string_lossy().to_string();
        let (dispatcher, cli) = dispatcher(
            &["dotnet-locator", "sdks", "--probe-dir", &dir],
            MapEnvironment::new(),
        );
        let mut ui = MockUI::new();
        let err = dispatcher
            .dispatch(&cli, &mut ui, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn pin_uses_environment_current_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("global.json"), r#"{"sdk":{"version":"8.0.100"}}"#).unwrap();

        let (dispatcher, cli) = dispatcher(
            &["dotnet-locator", "pin"],
            MapEnvironment::new().with_current_dir(temp.path()),
        );

        let mut ui = MockUI::new();
        dispatcher
            .dispatch(&cli, &mut ui, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(ui.value_of("SDK version"), Some("8.0.100"));
    }

    #[tokio::test]
    async fn pin_resolves_relative_probe_dir_against_environment() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("app")).unwrap();
        fs::write(
            temp.path().join("app/global.json"),
            r#"{"sdk":{"version":"7.0.400"}}"#,
        )
        .unwrap();

        let (dispatcher, cli) = dispatcher(
            &["dotnet-locator", "pin", "--probe-dir", "app"],
            MapEnvironment::new().with_current_dir(temp.path()),
        );
        let mut ui = MockUI::new();
        dispatcher
            .dispatch(&cli, &mut ui, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(ui.value_of("SDK version"), Some("7.0.400"));
    }
}
