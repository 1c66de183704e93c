mod bootstrap_helpers;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use wren_cli::Cli;
use wren_core::SystemClock;
use wren_deployment::port_is_free;
use wren_onboarding::open_operator_console;
use wren_orchestrator::{run_launch, LaunchCollaborators, LaunchSettings, RunOutcome, SystemBrowser};
use wren_runtime::{DockerRuntime, HttpReadinessProbe};

use crate::bootstrap_helpers::{
    init_tracing, pause_for_acknowledgement, pause_requested_after_parse_error, print_banner,
};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_after_parse_error(error),
    };
    init_tracing();
    let pause_on_exit = cli.pause_on_exit;
    let code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    };
    if pause_on_exit {
        pause_for_acknowledgement();
    }
    code
}

fn exit_after_parse_error(error: clap::Error) -> ExitCode {
    let _ = error.print();
    if !error.use_stderr() {
        return ExitCode::SUCCESS;
    }
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let env_value = std::env::var("WREN_PAUSE_ON_EXIT").ok();
    if pause_requested_after_parse_error(&args, env_value.as_deref()) {
        pause_for_acknowledgement();
    }
    ExitCode::from(u8::try_from(error.exit_code()).unwrap_or(1))
}

fn run(cli: Cli) -> Result<ExitCode> {
    print_banner();
    let settings = LaunchSettings::from_cli(&cli);
    let runtime = DockerRuntime::new(settings.docker_bin.clone(), settings.probe_timeout);
    let probe = HttpReadinessProbe::new(settings.probe_timeout)?;
    let clock = SystemClock;
    let browser = SystemBrowser;
    let mut console = open_operator_console();

    let report = run_launch(
        &settings,
        LaunchCollaborators {
            console: console.as_mut(),
            runtime: &runtime,
            probe: &probe,
            clock: &clock,
            browser: &browser,
            port_available: &port_is_free,
        },
    );

    match &report.outcome {
        RunOutcome::Success { ui_url } => {
            println!("Wren AI is running at {ui_url}");
            println!("You can now safely close this terminal window");
        }
        RunOutcome::Failure { phase, error } => {
            eprintln!("An error occurred while reaching {}: {error}", phase.as_str());
        }
    }
    if cli.report_json {
        let payload = serde_json::to_string_pretty(&report.to_json())
            .context("failed to render launch report")?;
        println!("{payload}");
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
