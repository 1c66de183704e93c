use std::{
    cell::{Cell, RefCell},
    fs,
    io::Cursor,
    path::Path,
    time::Duration,
};

use anyhow::{bail, Result};
use wren_core::{LauncherError, LlmProvider, ManualClock};
use wren_onboarding::{ConfigPresets, LineConsole};
use wren_orchestrator::{
    run_launch, BrowserOpener, LaunchCollaborators, LaunchPhase, LaunchReport, LaunchSettings,
    RunOutcome,
};
use wren_runtime::{ComposeUpSpec, ContainerRuntime, HealthTarget, ReadinessProbe};

struct FakeRuntime {
    reachable_after_starts: usize,
    starts: Cell<usize>,
    compose_calls: RefCell<Vec<ComposeUpSpec>>,
    compose_error: Option<String>,
}

impl FakeRuntime {
    fn running() -> Self {
        Self::reachable_after_starts(0)
    }

    fn reachable_after_starts(starts: usize) -> Self {
        Self {
            reachable_after_starts: starts,
            starts: Cell::new(0),
            compose_calls: RefCell::new(Vec::new()),
            compose_error: None,
        }
    }
}

impl ContainerRuntime for FakeRuntime {
    fn is_reachable(&self) -> bool {
        self.starts.get() >= self.reachable_after_starts
    }

    fn start(&self) -> Result<(), LauncherError> {
        self.starts.set(self.starts.get() + 1);
        Ok(())
    }

    fn compose_up(&self, spec: &ComposeUpSpec) -> Result<(), LauncherError> {
        self.compose_calls.borrow_mut().push(spec.clone());
        match &self.compose_error {
            Some(message) => Err(LauncherError::Launch(message.clone())),
            None => Ok(()),
        }
    }
}

/// Answers per target label; `None` means the target never becomes ready.
struct FakeProbe {
    ui_ready_after: Option<usize>,
    ai_ready_after: Option<usize>,
    ui_calls: Cell<usize>,
    ai_calls: Cell<usize>,
}

impl FakeProbe {
    fn healthy() -> Self {
        Self {
            ui_ready_after: Some(0),
            ai_ready_after: Some(0),
            ui_calls: Cell::new(0),
            ai_calls: Cell::new(0),
        }
    }
}

impl ReadinessProbe for FakeProbe {
    fn probe(&self, target: &HealthTarget) -> Result<()> {
        let (calls, ready_after) = if target.label == "UI" {
            (&self.ui_calls, self.ui_ready_after)
        } else {
            (&self.ai_calls, self.ai_ready_after)
        };
        calls.set(calls.get() + 1);
        match ready_after {
            Some(failures) if calls.get() > failures => Ok(()),
            _ => bail!("connection refused"),
        }
    }
}

#[derive(Default)]
struct FakeBrowser {
    opened: RefCell<Vec<String>>,
}

impl BrowserOpener for FakeBrowser {
    fn open(&self, url: &str) -> Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

struct Harness {
    console: LineConsole<Cursor<Vec<u8>>>,
    clock: ManualClock,
    browser: FakeBrowser,
}

impl Harness {
    fn with_input(script: &str) -> Self {
        Self {
            console: LineConsole::new(Cursor::new(script.as_bytes().to_vec())),
            clock: ManualClock::new(),
            browser: FakeBrowser::default(),
        }
    }

    fn run(
        &mut self,
        settings: &LaunchSettings,
        runtime: &FakeRuntime,
        probe: &FakeProbe,
    ) -> LaunchReport {
        run_launch(
            settings,
            LaunchCollaborators {
                console: &mut self.console,
                runtime,
                probe,
                clock: &self.clock,
                browser: &self.browser,
                port_available: &|_| true,
            },
        )
    }

    fn saw(&self, needle: &str) -> bool {
        self.console
            .transcript()
            .iter()
            .any(|line| line.contains(needle))
    }
}

fn interactive_settings(home: &Path) -> LaunchSettings {
    LaunchSettings {
        home_dir: Some(home.to_path_buf()),
        ..LaunchSettings::default()
    }
}

fn phases_through(last: LaunchPhase) -> Vec<LaunchPhase> {
    LaunchPhase::ALL
        .iter()
        .copied()
        .take_while(|phase| *phase <= last)
        .collect()
}

#[test]
fn scenario_openai_run_writes_artifacts_and_opens_browser() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut harness = Harness::with_input("1\nsk-abc123\n1\n");
    let runtime = FakeRuntime::running();
    let probe = FakeProbe::healthy();

    let report = harness.run(&interactive_settings(temp.path()), &runtime, &probe);

    assert_eq!(
        report.outcome,
        RunOutcome::Success {
            ui_url: "http://localhost:3000".to_string()
        }
    );
    assert!(report.reached.contains(&LaunchPhase::ArtifactsWritten));
    assert_eq!(report.reached, LaunchPhase::ALL.to_vec());

    let env = fs::read_to_string(temp.path().join(".wrenai/.env")).expect("read .env");
    assert!(env.contains("LLM_PROVIDER=OpenAI\n"));
    assert!(env.contains("OPENAI_API_KEY=sk-abc123\n"));
    assert!(env.contains("GENERATION_MODEL=gpt-4o\n"));
    assert!(env.contains("TELEMETRY_ENABLED=true\n"));
    assert!(temp.path().join(".wrenai/docker-compose.yaml").is_file());

    assert_eq!(runtime.compose_calls.borrow().len(), 1);
    assert_eq!(*harness.browser.opened.borrow(), vec!["http://localhost:3000"]);
    assert!(harness.saw("You can opt out of sharing these statistics"));
}

#[test]
fn scenario_custom_provider_without_external_env_file_stops_after_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut harness = Harness::with_input("Custom\n");
    let runtime = FakeRuntime::running();
    let probe = FakeProbe::healthy();

    let report = harness.run(&interactive_settings(temp.path()), &runtime, &probe);

    let expected_path = temp.path().join(".wrenai").join(".env.ai");
    assert_eq!(
        report.outcome,
        RunOutcome::Failure {
            phase: LaunchPhase::ConfigCollected,
            error: LauncherError::MissingExternalConfig {
                path: expected_path.clone()
            },
        }
    );
    assert_eq!(report.reached, phases_through(LaunchPhase::DirectoryReady));
    assert!(!temp.path().join(".wrenai/.env").exists());
    assert!(!temp.path().join(".wrenai/docker-compose.yaml").exists());
    assert!(runtime.compose_calls.borrow().is_empty());
    assert_eq!(runtime.starts.get(), 0);
}

#[test]
fn scenario_custom_provider_with_external_env_file_launches_with_both_env_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(temp.path().join(".wrenai")).expect("mkdir");
    fs::write(temp.path().join(".wrenai/.env.ai"), "LLM_PROVIDER=ollama\n").expect("seed");
    let mut harness = Harness::with_input("2\n");
    let runtime = FakeRuntime::running();
    let probe = FakeProbe::healthy();

    let report = harness.run(&interactive_settings(temp.path()), &runtime, &probe);

    assert!(report.is_success());
    let calls = runtime.compose_calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].env_files.len(), 2);
    let compose = fs::read_to_string(temp.path().join(".wrenai/docker-compose.yaml"))
        .expect("read compose");
    assert!(compose.contains(".env.ai"));
    let env = fs::read_to_string(temp.path().join(".wrenai/.env")).expect("read .env");
    assert!(env.contains("LLM_PROVIDER=Custom\n"));
}

#[test]
fn scenario_ui_never_ready_times_out_without_probing_ai() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut harness = Harness::with_input("1\nsk-abc123\n1\n");
    let runtime = FakeRuntime::running();
    let probe = FakeProbe {
        ui_ready_after: None,
        ..FakeProbe::healthy()
    };

    let report = harness.run(&interactive_settings(temp.path()), &runtime, &probe);

    assert_eq!(
        report.outcome,
        RunOutcome::Failure {
            phase: LaunchPhase::UiReady,
            error: LauncherError::Timeout {
                target: "UI".to_string()
            },
        }
    );
    assert_eq!(report.reached, phases_through(LaunchPhase::StackLaunched));
    assert_eq!(probe.ai_calls.get(), 0);
    assert_eq!(probe.ui_calls.get(), 25);
    assert!(harness.clock.elapsed() > Duration::from_secs(120));
    assert!(harness.browser.opened.borrow().is_empty());
}

#[test]
fn scenario_ai_shares_deadline_with_ui_check() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut harness = Harness::with_input("1\nsk-abc123\n1\n");
    let runtime = FakeRuntime::running();
    let probe = FakeProbe {
        ui_ready_after: Some(20),
        ai_ready_after: None,
        ..FakeProbe::healthy()
    };

    let report = harness.run(&interactive_settings(temp.path()), &runtime, &probe);

    assert_eq!(
        report.outcome,
        RunOutcome::Failure {
            phase: LaunchPhase::AiReady,
            error: LauncherError::Timeout {
                target: "AI".to_string()
            },
        }
    );
    assert_eq!(probe.ui_calls.get(), 21);
    assert_eq!(probe.ai_calls.get(), 5);
}

#[test]
fn scenario_runtime_is_started_and_re_probed_until_reachable() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut harness = Harness::with_input("");
    let runtime = FakeRuntime::reachable_after_starts(2);
    let probe = FakeProbe::healthy();
    let settings = LaunchSettings {
        presets: ConfigPresets {
            provider: Some(LlmProvider::OpenAi),
            api_key: Some("sk-preset".to_string()),
            generation_model: Some(wren_core::GenerationModel::Gpt4Turbo),
        },
        telemetry_disabled: true,
        open_browser: false,
        ..interactive_settings(temp.path())
    };

    let report = harness.run(&settings, &runtime, &probe);

    assert!(report.is_success());
    assert_eq!(runtime.starts.get(), 2);
    assert!(harness.saw("Docker daemon is not running, opening Docker Desktop"));
    assert!(harness.saw("Browser opening skipped"));
    assert!(harness.browser.opened.borrow().is_empty());
    let env = fs::read_to_string(temp.path().join(".wrenai/.env")).expect("read .env");
    assert!(env.contains("TELEMETRY_ENABLED=false\n"));
    assert!(env.contains("GENERATION_MODEL=gpt-4-turbo\n"));
}

#[test]
fn scenario_compose_failure_keeps_written_artifacts() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut harness = Harness::with_input("1\nsk-abc123\n3\n");
    let runtime = FakeRuntime {
        compose_error: Some("pull access denied".to_string()),
        ..FakeRuntime::running()
    };
    let probe = FakeProbe::healthy();

    let report = harness.run(&interactive_settings(temp.path()), &runtime, &probe);

    assert_eq!(
        report.outcome,
        RunOutcome::Failure {
            phase: LaunchPhase::StackLaunched,
            error: LauncherError::Launch("pull access denied".to_string()),
        }
    );
    assert!(temp.path().join(".wrenai/.env").is_file());
    assert_eq!(probe.ui_calls.get(), 0);
}

#[test]
fn scenario_rerun_with_same_answers_rewrites_identical_artifacts() {
    let temp = tempfile::tempdir().expect("tempdir");
    let runtime = FakeRuntime::running();
    let probe = FakeProbe::healthy();

    let mut first = Harness::with_input("1\nsk-abc123\n1\n");
    assert!(first
        .run(&interactive_settings(temp.path()), &runtime, &probe)
        .is_success());
    let env_before = fs::read(temp.path().join(".wrenai/.env")).expect("read");

    let mut second = Harness::with_input("1\nsk-abc123\n1\n");
    assert!(second
        .run(&interactive_settings(temp.path()), &runtime, &probe)
        .is_success());
    assert_eq!(fs::read(temp.path().join(".wrenai/.env")).expect("reread"), env_before);
}
