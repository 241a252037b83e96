//! Discovery by running `dotnet --info`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{info_output, DiscoveryContext, ProbeRequest};
use crate::discovery::find_global_json;
use crate::discovery::root::executable_dir;
use crate::error::{LocatorError, Result};
use crate::model::InstallationInfo;
use crate::shell::{capture, CommandOptions};

/// Argument that makes the host print its environment report.
pub const INFO_ARG: &str = "--info";

/// Variables that keep the report in English and free of first-run banners.
const INFO_ENV: &[(&str, &str)] = &[
    ("DOTNET_CLI_UI_LANGUAGE", "en"),
    ("DOTNET_NOLOGO", "1"),
    ("DOTNET_CLI_TELEMETRY_OPTOUT", "1"),
];

/// Runs the `dotnet` executable and parses what it reports.
pub struct ProcessStrategy {
    context: Arc<DiscoveryContext>,
}

impl ProcessStrategy {
    pub fn new(context: Arc<DiscoveryContext>) -> Self {
        Self { context }
    }

    pub async fn run(
        &self,
        request: &ProbeRequest,
        cancel: &CancellationToken,
    ) -> Result<InstallationInfo> {
        let executable = self.executable(request, cancel).await?;

        let options = CommandOptions {
            cwd: Some(request.probing_dir.clone()),
            env: INFO_ENV
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        };

        let result = capture(&executable, &[INFO_ARG], &options, cancel).await?;
        if !result.success {
            return Err(LocatorError::ProcessFailed {
                command: format!("{} {}", executable.display(), INFO_ARG),
                exit_code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            });
        }

        let parsed = info_output::parse(&result.stdout)?;
        let root = match &request.explicit_root {
            Some(root) => root.clone(),
            None => executable_dir(&executable).ok_or_else(|| LocatorError::RootNotFound {
                message: format!("no directory for {}", executable.display()),
            })?,
        };

        Ok(parsed.into_installation(root, executable, find_global_json(&request.probing_dir)))
    }

    async fn executable(
        &self,
        request: &ProbeRequest,
        cancel: &CancellationToken,
    ) -> Result<PathBuf> {
        let name = self.context.family.executable_name();
        match &request.explicit_root {
            Some(root) => {
                let executable = root.join(name);
                if executable.is_file() {
                    Ok(executable)
                } else {
                    Err(LocatorError::ExecutableNotFound {
                        message: format!("{} does not contain {}", root.display(), name),
                    })
                }
            }
            None => self
                .context
                .locate_executable(cancel)
                .await?
                .ok_or_else(|| LocatorError::ExecutableNotFound {
                    message: format!("{} is not on PATH", name),
                }),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::environment::MapEnvironment;
    use crate::platform::OsFamily;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_script(root: &Path, body: &str) {
        let path = root.join("dotnet");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn strategy(env: MapEnvironment) -> ProcessStrategy {
        ProcessStrategy::new(Arc::new(DiscoveryContext {
            env: Arc::new(env),
            family: OsFamily::Unix,
            system_search: false,
            default_roots: Some(vec![]),
        }))
    }

    fn request(root: &Path) -> ProbeRequest {
        ProbeRequest {
            probing_dir: root.to_path_buf(),
            explicit_root: Some(root.to_path_buf()),
        }
    }

    #[tokio::test]
    async fn parses_report_from_script() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write_script(
            root,
            &format!(
                "cat <<'EOF'\nHost:\n  Version: 8.0.0\n  Architecture: x64\n\n.NET SDKs installed:\n  8.0.100 [{0}/sdk]\n\n.NET runtimes installed:\n  Microsoft.NETCore.App 8.0.0 [{0}/shared/Microsoft.NETCore.App]\nEOF",
                root.display()
            ),
        );

        let info = strategy(MapEnvironment::new())
            .run(&request(root), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(info.root, root);
        assert_eq!(info.host.version, "8.0.0");
        assert_eq!(info.host.executable, root.join("dotnet"));
        assert_eq!(info.sdks[0].path, root.join("sdk").join("8.0.100"));
        assert_eq!(info.frameworks[0].name, "Microsoft.NETCore.App");
    }

    #[tokio::test]
    async fn runs_in_probing_dir_with_english_output() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        let project = temp.path().join("project");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("global.json"), r#"{"sdk":{"version":"8.0.100"}}"#).unwrap();
        write_script(
            &root,
            "printf '.NET SDKs installed:\\n  %s [%s]\\n' \"$DOTNET_CLI_UI_LANGUAGE$DOTNET_NOLOGO\" \"$(pwd)\"",
        );

        let info = strategy(MapEnvironment::new())
            .run(
                &ProbeRequest {
                    probing_dir: project.clone(),
                    explicit_root: Some(root.clone()),
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(info.sdks[0].version, "en1");
        let reported_dir = info.sdks[0].path.parent().unwrap().to_path_buf();
        assert_eq!(
            fs::canonicalize(reported_dir).unwrap(),
            fs::canonicalize(&project).unwrap()
        );
        assert_eq!(info.pinned_sdk_version(), Some("8.0.100"));
    }

    #[tokio::test]
    async fn non_zero_exit_is_process_failed() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "echo 'host is broken' >&2\nexit 3");

        let err = strategy(MapEnvironment::new())
            .run(&request(temp.path()), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            LocatorError::ProcessFailed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "host is broken");
            }
            other => panic!("expected ProcessFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_output_is_parse_error() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "echo 'Welcome to .NET'");

        let err = strategy(MapEnvironment::new())
            .run(&request(temp.path()), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LocatorError::Parse { .. }));
    }

    #[tokio::test]
    async fn explicit_root_without_executable() {
        let temp = TempDir::new().unwrap();
        let err = strategy(MapEnvironment::new())
            .run(&request(temp.path()), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LocatorError::ExecutableNotFound { .. }));
    }

    #[tokio::test]
    async fn executable_found_on_path() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "printf 'Host:\\n  Version: 7.0.5\\n'");
        let env = MapEnvironment::new().with_var("PATH", temp.path().to_string_lossy());

        let info = strategy(env)
            .run(
                &ProbeRequest {
                    probing_dir: temp.path().to_path_buf(),
                    explicit_root: None,
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(info.host.version, "7.0.5");
        assert_eq!(info.root, fs::canonicalize(temp.path()).unwrap());
    }

    #[tokio::test]
    async fn cancellation_stops_hung_process() {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "exec sleep 30");

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let err = strategy(MapEnvironment::new())
            .run(&request(temp.path()), &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
