//! Child process execution.
//!
//! [`capture`] runs a program to completion while draining stdout and stderr
//! on separate tasks, so a chatty child cannot block on a full pipe.
//! [`first_output_line`] is the blocking helper used by the PATH search
//! fallbacks.

use crate::error::{LocatorError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,
}

/// Run `program` with `args`, capturing its output.
///
/// A non-zero exit is reported through [`CommandResult::success`], not as an
/// error. Failing to spawn is a [`LocatorError::ProcessFailed`] without an
/// exit code. If `cancel` fires, the child is killed, its exit is awaited,
/// and [`LocatorError::Cancelled`] is returned.
pub async fn capture(
    program: &Path,
    args: &[&str],
    options: &CommandOptions,
    cancel: &CancellationToken,
) -> Result<CommandResult> {
    let start = Instant::now();
    let command_line = display_command(program, args);

    if cancel.is_cancelled() {
        return Err(LocatorError::Cancelled);
    }

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    let mut child = cmd.spawn().map_err(|e| LocatorError::ProcessFailed {
        command: command_line.clone(),
        exit_code: None,
        stderr: e.to_string(),
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow::anyhow!("stdout of '{}' was not captured", command_line))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow::anyhow!("stderr of '{}' was not captured", command_line))?;

    let stdout_task = tokio::spawn(read_all(stdout));
    let stderr_task = tokio::spawn(read_all(stderr));

    let status = tokio::select! {
        status = child.wait() => status?,
        () = cancel.cancelled() => {
            tracing::debug!(command = %command_line, "cancelled, killing child process");
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            return Err(LocatorError::Cancelled);
        }
    };

    let drained = async {
        let stdout = stdout_task.await.map_err(anyhow::Error::from)??;
        let stderr = stderr_task.await.map_err(anyhow::Error::from)??;
        Ok::<_, LocatorError>((stdout, stderr))
    };

    let (stdout, stderr) = tokio::select! {
        result = drained => result?,
        () = cancel.cancelled() => return Err(LocatorError::Cancelled),
    };

    let duration = start.elapsed();
    tracing::trace!(command = %command_line, code = ?status.code(), ?duration, "process exited");

    Ok(CommandResult {
        exit_code: status.code(),
        stdout,
        stderr,
        duration,
        success: status.success(),
    })
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// How often a running lookup command checks for cancellation.
const LOOKUP_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Run a lookup command and return the first non-empty line of its stdout.
///
/// Blocking; call it off the async runtime. Spawn failures, non-zero exits
/// and empty output all yield `None`, as does `cancel` firing, in which case
/// the child is killed.
pub fn first_output_line(
    program: &str,
    args: &[&str],
    cancel: Option<&CancellationToken>,
) -> Option<String> {
    let mut child = std::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    while child.try_wait().ok()?.is_none() {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            tracing::debug!(program, "cancelled, killing lookup command");
            let _ = child.kill();
            let _ = child.wait();
            return None;
        }
        std::thread::sleep(LOOKUP_POLL_INTERVAL);
    }

    let output = child.wait_with_output().ok()?;
    if !output.status.success() {
        tracing::trace!(program, code = ?output.status.code(), "lookup command failed");
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn display_command(program: &Path, args: &[&str]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(args.iter().map(|a| a.to_string()));
    parts.join(" ")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh() -> PathBuf {
        PathBuf::from("/bin/sh")
    }

    #[tokio::test]
    async fn capture_successful_command() {
        let cancel = CancellationToken::new();
        let result = capture(&sh(), &["-c", "echo hello"], &CommandOptions::default(), &cancel)
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[tokio::test]
    async fn capture_failing_command_keeps_stderr() {
        let cancel = CancellationToken::new();
        let result = capture(
            &sh(),
            &["-c", "echo broken >&2; exit 4"],
            &CommandOptions::default(),
            &cancel,
        )
        .await
        .unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(4));
        assert!(result.stderr.contains("broken"));
    }

    #[tokio::test]
    async fn capture_with_env_and_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        options.env.insert("MY_VAR".into(), "my_value".into());

        let cancel = CancellationToken::new();
        let result = capture(&sh(), &["-c", "echo $MY_VAR; pwd"], &options, &cancel)
            .await
            .unwrap();

        assert!(result.stdout.contains("my_value"));
        let name = temp.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(result.stdout.contains(&name));
    }

    #[tokio::test]
    async fn capture_drains_large_stderr_without_deadlock() {
        let cancel = CancellationToken::new();
        let script = "i=0; while [ $i -lt 4000 ]; do echo 'xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx' >&2; i=$((i+1)); done; echo done";
        let result = capture(&sh(), &["-c", script], &CommandOptions::default(), &cancel)
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.stderr.len() > 64 * 1024);
        assert!(result.stdout.contains("done"));
    }

    #[tokio::test]
    async fn capture_spawn_failure_is_process_failed() {
        let cancel = CancellationToken::new();
        let err = capture(
            Path::new("/nonexistent/dotnet"),
            &["--info"],
            &CommandOptions::default(),
            &cancel,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, LocatorError::ProcessFailed { exit_code: None, .. }));
    }

    #[tokio::test]
    async fn capture_cancellation_kills_child() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let err = capture(&sh(), &["-c", "exec sleep 30"], &CommandOptions::default(), &cancel)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn capture_already_cancelled_does_not_spawn() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = capture(
            Path::new("/nonexistent/dotnet"),
            &[],
            &CommandOptions::default(),
            &cancel,
        )
        .await
        .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn first_output_line_takes_first_non_empty_line() {
        let line = first_output_line(
            "sh",
            &["-c", "echo; echo '  /usr/bin/dotnet  '; echo other"],
            None,
        );
        assert_eq!(line.as_deref(), Some("/usr/bin/dotnet"));
    }

    #[test]
    fn first_output_line_none_on_failure_or_empty() {
        assert_eq!(first_output_line("sh", &["-c", "echo found; exit 1"], None), None);
        assert_eq!(first_output_line("sh", &["-c", "true"], None), None);
        assert_eq!(first_output_line("/nonexistent/lookup", &[], None), None);
    }

    #[test]
    fn first_output_line_killed_on_cancellation() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            trigger.cancel();
        });

        let start = Instant::now();
        let line = first_output_line("sh", &["-c", "sleep 30; echo late"], Some(&cancel));
        assert_eq!(line, None);
        assert!(start.elapsed() < Duration::from_secs(10));
    }
}
