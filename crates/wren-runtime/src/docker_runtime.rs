//! Docker CLI adapter.
//!
//! Every call shells out to the configured docker executable. Reachability
//! probes are bounded by a timeout; `compose up` is not, because the first run
//! pulls images and can legitimately take minutes.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use wait_timeout::ChildExt;
use wren_core::{LauncherError, LlmProvider, ProjectDirectory};

const STDERR_TAIL_LINES: usize = 20;
const DOCKER_DESKTOP_WINDOWS_PATH: &str = r"C:\Program Files\Docker\Docker\Docker Desktop.exe";

/// Trait contract for the container runtime the launcher drives.
pub trait ContainerRuntime {
    /// True when the daemon answers within the probe timeout.
    fn is_reachable(&self) -> bool;

    /// One-shot request to bring the daemon up. Does not wait for it.
    fn start(&self) -> Result<(), LauncherError>;

    fn compose_up(&self, spec: &ComposeUpSpec) -> Result<(), LauncherError>;
}

/// Arguments for a single detached `docker compose up`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeUpSpec {
    pub project_name: String,
    pub project_dir: PathBuf,
    pub compose_file: PathBuf,
    pub env_files: Vec<PathBuf>,
}

impl ComposeUpSpec {
    pub fn for_project(
        project_name: &str,
        project_dir: &ProjectDirectory,
        provider: LlmProvider,
    ) -> Self {
        let mut env_files = vec![project_dir.env_file()];
        if provider == LlmProvider::Custom {
            env_files.push(project_dir.external_env_file());
        }
        Self {
            project_name: project_name.to_string(),
            project_dir: project_dir.path().to_path_buf(),
            compose_file: project_dir.compose_file(),
            env_files,
        }
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "compose".to_string(),
            "--project-name".to_string(),
            self.project_name.clone(),
            "--project-directory".to_string(),
            path_arg(&self.project_dir),
            "--file".to_string(),
            path_arg(&self.compose_file),
        ];
        for env_file in &self.env_files {
            args.push("--env-file".to_string());
            args.push(path_arg(env_file));
        }
        args.push("up".to_string());
        args.push("--detach".to_string());
        args
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

fn shell_quote_token(token: &str) -> String {
    if !token.is_empty()
        && token
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '='))
    {
        return token.to_string();
    }
    format!("'{}'", token.replace('\'', "'\"'\"'"))
}

/// Renders a command line for log and error messages.
pub fn render_command(executable: &str, args: &[String]) -> String {
    let mut parts = Vec::with_capacity(args.len().saturating_add(1));
    parts.push(shell_quote_token(executable));
    parts.extend(args.iter().map(|arg| shell_quote_token(arg)));
    parts.join(" ")
}

/// Last non-empty lines of a process's stderr, kept verbatim.
pub fn stderr_tail(stderr: &[u8], max_lines: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

/// Platform start action for Docker Desktop. `None` when the platform has no desktop app to open.
pub fn desktop_start_command(os: &str) -> Option<(String, Vec<String>)> {
    match os {
        "macos" => Some((
            "open".to_string(),
            vec!["-a".to_string(), "Docker".to_string()],
        )),
        "windows" => Some((
            "cmd".to_string(),
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                DOCKER_DESKTOP_WINDOWS_PATH.to_string(),
            ],
        )),
        _ => None,
    }
}

/// [`ContainerRuntime`] backed by the Docker CLI.
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    docker_bin: String,
    probe_timeout: Duration,
}

impl DockerRuntime {
    pub fn new(docker_bin: impl Into<String>, probe_timeout: Duration) -> Self {
        Self {
            docker_bin: docker_bin.into(),
            probe_timeout,
        }
    }

    fn resolve_binary(&self) -> Result<PathBuf, LauncherError> {
        which::which(self.docker_bin.trim()).map_err(|error| {
            tracing::debug!(docker_bin = %self.docker_bin, error = %error, "docker lookup failed");
            LauncherError::RuntimeUnavailable("docker executable not found".to_string())
        })
    }

    fn run_bounded(&self, executable: &Path, args: &[String]) -> Result<()> {
        let command_str = render_command(&executable.display().to_string(), args);
        let mut child = Command::new(executable)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to spawn {command_str}"))?;

        let timeout = self.probe_timeout.max(Duration::from_millis(1));
        let status = match child
            .wait_timeout(timeout)
            .with_context(|| format!("failed while waiting for {command_str}"))?
        {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                bail!(
                    "{command_str} timed out after {} ms",
                    timeout.as_millis()
                );
            }
        };
        if !status.success() {
            let code = status
                .code()
                .map(|value| value.to_string())
                .unwrap_or_else(|| "terminated_by_signal".to_string());
            bail!("{command_str} exited with status {code}");
        }
        Ok(())
    }
}

impl ContainerRuntime for DockerRuntime {
    fn is_reachable(&self) -> bool {
        let Ok(executable) = self.resolve_binary() else {
            return false;
        };
        match self.run_bounded(&executable, &["info".to_string()]) {
            Ok(()) => true,
            Err(error) => {
                tracing::debug!(error = %format!("{error:#}"), "docker daemon probe failed");
                false
            }
        }
    }

    fn start(&self) -> Result<(), LauncherError> {
        self.resolve_binary()?;
        let Some((program, args)) = desktop_start_command(std::env::consts::OS) else {
            return Err(LauncherError::RuntimeUnavailable(format!(
                "the docker daemon is not running and cannot be started automatically on {}; start it and re-run the launcher",
                std::env::consts::OS
            )));
        };
        let executable = which::which(&program).map_err(|_| {
            LauncherError::RuntimeUnavailable(format!("{program} executable not found"))
        })?;
        self.run_bounded(&executable, &args)
            .map_err(|error| LauncherError::RuntimeUnavailable(format!("{error:#}")))
    }

    fn compose_up(&self, spec: &ComposeUpSpec) -> Result<(), LauncherError> {
        let executable = self
            .resolve_binary()
            .map_err(|error| LauncherError::Launch(error.to_string()))?;
        let args = spec.args();
        let command_str = render_command(&self.docker_bin, &args);
        tracing::info!(command = %command_str, "running compose up");

        let output = Command::new(&executable)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to spawn {command_str}"))
            .map_err(|error| LauncherError::Launch(format!("{error:#}")))?;
        if output.status.success() {
            return Ok(());
        }

        let code = output
            .status
            .code()
            .map(|value| value.to_string())
            .unwrap_or_else(|| "terminated_by_signal".to_string());
        let tail = stderr_tail(&output.stderr, STDERR_TAIL_LINES);
        if tail.is_empty() {
            return Err(LauncherError::Launch(format!(
                "{command_str} exited with status {code}"
            )));
        }
        Err(LauncherError::Launch(format!(
            "{command_str} exited with status {code}:\n{tail}"
        )))
    }
}
