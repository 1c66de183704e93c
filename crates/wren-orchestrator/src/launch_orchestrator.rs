//! Phase sequencing for one launcher run.
//!
//! The phases run in a fixed order and never move backwards. The first error
//! ends the run as a `Failure` tagged with the phase that was being attempted;
//! nothing already done is rolled back. A panic inside any phase is caught at
//! the top and reported the same way with [`LauncherError::Unexpected`].

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};
use wren_cli::Cli;
use wren_core::{Clock, LauncherError, PortAssignment};
use wren_deployment::{allocate_ports, provision_artifacts};
use wren_onboarding::{
    collect_configuration, ensure_project_dir, resolve_home_dir, ConfigPresets, OperatorConsole,
};
use wren_runtime::{
    ContainerRuntime, HealthPoller, HealthTarget, ReadinessProbe, RuntimeReadinessGate,
    StackLauncher,
};

use crate::launch_browser::BrowserOpener;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates the launch phases in execution order.
pub enum LaunchPhase {
    Start,
    DirectoryReady,
    ConfigCollected,
    RuntimeReady,
    ArtifactsWritten,
    StackLaunched,
    UiReady,
    AiReady,
    BrowserOpened,
}

impl LaunchPhase {
    pub const ALL: [LaunchPhase; 9] = [
        LaunchPhase::Start,
        LaunchPhase::DirectoryReady,
        LaunchPhase::ConfigCollected,
        LaunchPhase::RuntimeReady,
        LaunchPhase::ArtifactsWritten,
        LaunchPhase::StackLaunched,
        LaunchPhase::UiReady,
        LaunchPhase::AiReady,
        LaunchPhase::BrowserOpened,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::DirectoryReady => "directory_ready",
            Self::ConfigCollected => "config_collected",
            Self::RuntimeReady => "runtime_ready",
            Self::ArtifactsWritten => "artifacts_written",
            Self::StackLaunched => "stack_launched",
            Self::UiReady => "ui_ready",
            Self::AiReady => "ai_ready",
            Self::BrowserOpened => "browser_opened",
        }
    }

    /// The following phase; `None` after `BrowserOpened`.
    pub fn next(self) -> Option<LaunchPhase> {
        let index = Self::ALL.iter().position(|phase| *phase == self)?;
        Self::ALL.get(index + 1).copied()
    }
}

/// Resolved launcher settings, decoupled from the CLI parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
    pub home_dir: Option<PathBuf>,
    pub project_name: String,
    pub ui_port: u16,
    pub ai_port: u16,
    pub presets: ConfigPresets,
    pub telemetry_disabled: bool,
    pub docker_bin: String,
    pub runtime_retry_interval: Duration,
    pub poll_interval: Duration,
    pub readiness_timeout: Duration,
    pub probe_timeout: Duration,
    pub open_browser: bool,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            home_dir: None,
            project_name: "wrenai".to_string(),
            ui_port: 3000,
            ai_port: 5555,
            presets: ConfigPresets::default(),
            telemetry_disabled: false,
            docker_bin: "docker".to_string(),
            runtime_retry_interval: Duration::from_secs(5),
            poll_interval: Duration::from_secs(5),
            readiness_timeout: Duration::from_secs(120),
            probe_timeout: Duration::from_secs(5),
            open_browser: true,
        }
    }
}

impl LaunchSettings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            home_dir: cli.home_dir.clone(),
            project_name: cli.project_name.clone(),
            ui_port: cli.ui_port,
            ai_port: cli.ai_port,
            presets: ConfigPresets::from_cli(cli),
            telemetry_disabled: cli.disable_telemetry,
            docker_bin: cli.docker_bin.clone(),
            runtime_retry_interval: Duration::from_millis(cli.runtime_retry_interval_ms),
            poll_interval: Duration::from_millis(cli.poll_interval_ms),
            readiness_timeout: Duration::from_millis(cli.readiness_timeout_ms),
            probe_timeout: Duration::from_millis(cli.probe_timeout_ms),
            open_browser: cli.open_browser,
        }
    }
}

/// Everything the run talks to outside its own process state.
pub struct LaunchCollaborators<'a> {
    pub console: &'a mut dyn OperatorConsole,
    pub runtime: &'a dyn ContainerRuntime,
    pub probe: &'a dyn ReadinessProbe,
    pub clock: &'a dyn Clock,
    pub browser: &'a dyn BrowserOpener,
    pub port_available: &'a dyn Fn(u16) -> bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Terminal result of a run.
pub enum RunOutcome {
    Success { ui_url: String },
    Failure { phase: LaunchPhase, error: LauncherError },
}

/// Outcome plus what the run got done before it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    pub outcome: RunOutcome,
    pub reached: Vec<LaunchPhase>,
    pub ports: Option<PortAssignment>,
    pub project_dir: Option<PathBuf>,
}

impl LaunchReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Success { .. })
    }

    pub fn last_reached(&self) -> Option<LaunchPhase> {
        self.reached.last().copied()
    }

    pub fn to_json(&self) -> Value {
        let outcome = match &self.outcome {
            RunOutcome::Success { ui_url } => json!({
                "status": "success",
                "ui_url": ui_url,
            }),
            RunOutcome::Failure { phase, error } => json!({
                "status": "failure",
                "phase": phase,
                "reason_code": error.reason_code(),
                "message": error.to_string(),
            }),
        };
        json!({
            "outcome": outcome,
            "reached": self.reached,
            "ports": self.ports,
            "project_dir": self.project_dir.as_ref().map(|path| path.display().to_string()),
        })
    }
}

#[derive(Debug, Default)]
struct LaunchProgress {
    reached: Vec<LaunchPhase>,
    ports: Option<PortAssignment>,
    project_dir: Option<PathBuf>,
}

impl LaunchProgress {
    fn reach(&mut self, phase: LaunchPhase) {
        tracing::info!(phase = phase.as_str(), "launch phase reached");
        self.reached.push(phase);
    }

    fn attempting(&self) -> LaunchPhase {
        self.reached
            .last()
            .and_then(|phase| phase.next())
            .unwrap_or(LaunchPhase::Start)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "panic with non-string payload".to_string()
}

/// Runs every phase in order and returns the run's report. Never panics.
pub fn run_launch(
    settings: &LaunchSettings,
    mut collaborators: LaunchCollaborators<'_>,
) -> LaunchReport {
    let mut progress = LaunchProgress::default();
    let result = catch_unwind(AssertUnwindSafe(|| {
        run_phases(settings, &mut collaborators, &mut progress)
    }))
    .unwrap_or_else(|payload| {
        Err(LauncherError::Unexpected(panic_message(payload.as_ref())))
    });

    let outcome = match result {
        Ok(ui_url) => RunOutcome::Success { ui_url },
        Err(error) => {
            let phase = progress.attempting();
            tracing::info!(
                phase = phase.as_str(),
                reason_code = error.reason_code(),
                error = %error,
                "launch failed"
            );
            RunOutcome::Failure { phase, error }
        }
    };
    LaunchReport {
        outcome,
        reached: progress.reached,
        ports: progress.ports,
        project_dir: progress.project_dir,
    }
}

fn run_phases(
    settings: &LaunchSettings,
    collaborators: &mut LaunchCollaborators<'_>,
    progress: &mut LaunchProgress,
) -> Result<String, LauncherError> {
    let console = &mut *collaborators.console;
    let runtime = collaborators.runtime;
    let clock = collaborators.clock;
    progress.reach(LaunchPhase::Start);

    console.notice("Preparing project directory");
    let home_dir = resolve_home_dir(settings.home_dir.as_deref())?;
    let project_dir = ensure_project_dir(&home_dir)?;
    progress.project_dir = Some(project_dir.path().to_path_buf());
    progress.reach(LaunchPhase::DirectoryReady);

    let config = collect_configuration(
        console,
        &settings.presets,
        &project_dir,
        settings.telemetry_disabled,
    )?;
    progress.reach(LaunchPhase::ConfigCollected);

    console.notice("Checking if Docker daemon is running");
    let mut gate = RuntimeReadinessGate::new(runtime, clock, settings.runtime_retry_interval);
    gate.ensure_running(|_attempt| {
        console.notice("Docker daemon is not running, opening Docker Desktop");
    })?;
    progress.reach(LaunchPhase::RuntimeReady);

    console.notice("Writing docker-compose file and env file");
    let ports = allocate_ports(
        settings.ui_port,
        settings.ai_port,
        collaborators.port_available,
    )?;
    progress.ports = Some(ports);
    provision_artifacts(&config, &ports, &project_dir)?;
    progress.reach(LaunchPhase::ArtifactsWritten);

    console.notice("Launching Wren AI");
    StackLauncher::new(runtime).up(&settings.project_name, &project_dir, config.provider)?;
    progress.reach(LaunchPhase::StackLaunched);

    console.notice("Wren AI is starting, please wait for a moment...");
    let deadline = clock.now() + settings.readiness_timeout;
    let poller = HealthPoller::new(collaborators.probe, clock, settings.poll_interval);
    poller.wait_until_ready(&HealthTarget::ui(ports.ui), deadline)?;
    console.notice("UI Service is ready");
    progress.reach(LaunchPhase::UiReady);

    poller.wait_until_ready(&HealthTarget::ai(ports.ai), deadline)?;
    console.notice("AI Service is ready");
    progress.reach(LaunchPhase::AiReady);

    let ui_url = ports.ui_url();
    if settings.open_browser {
        console.notice("Opening browser");
        if let Err(error) = collaborators.browser.open(&ui_url) {
            tracing::warn!(url = %ui_url, error = %format!("{error:#}"), "failed to open browser");
            console.notice(&format!(
                "Could not open a browser, visit {ui_url} to use Wren AI"
            ));
        }
    } else {
        console.notice(&format!("Browser opening skipped, visit {ui_url} to use Wren AI"));
    }
    progress.reach(LaunchPhase::BrowserOpened);
    Ok(ui_url)
}
