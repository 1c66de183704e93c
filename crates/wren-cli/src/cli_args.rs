use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::{CliGenerationModel, CliLlmProvider};

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_port(value: &str) -> Result<u16, String> {
    let parsed = value
        .parse::<u16>()
        .map_err(|error| format!("failed to parse port: {error}"))?;
    if parsed == 0 {
        return Err("port must be in range 1..=65535".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "wren-launcher",
    about = "Prepare, launch, and health-check a local Wren AI stack",
    version
)]
pub struct Cli {
    #[arg(
        long = "home-dir",
        env = "WREN_HOME_DIR",
        help = "Directory that holds the .wrenai project directory (defaults to the user home)"
    )]
    pub home_dir: Option<PathBuf>,

    #[arg(
        long = "project-name",
        env = "WREN_PROJECT_NAME",
        default_value = "wrenai",
        help = "Compose project name used when bringing the stack up"
    )]
    pub project_name: String,

    #[arg(
        long = "ui-port",
        env = "WREN_UI_PORT",
        default_value_t = 3000,
        value_parser = parse_port,
        help = "First host port to try for the UI; the next free port is used when taken"
    )]
    pub ui_port: u16,

    #[arg(
        long = "ai-port",
        env = "WREN_AI_PORT",
        default_value_t = 5555,
        value_parser = parse_port,
        help = "First host port to try for the AI service; the next free port is used when taken"
    )]
    pub ai_port: u16,

    #[arg(
        long = "llm-provider",
        env = "WREN_LLM_PROVIDER",
        value_enum,
        help = "Skip the provider prompt and use this provider"
    )]
    pub llm_provider: Option<CliLlmProvider>,

    #[arg(
        long = "openai-api-key",
        env = "OPENAI_API_KEY",
        hide_env_values = true,
        help = "Skip the API key prompt when the value starts with sk-; other values fall back to the prompt"
    )]
    pub openai_api_key: Option<String>,

    #[arg(
        long = "generation-model",
        env = "WREN_GENERATION_MODEL",
        value_enum,
        help = "Skip the generation model prompt and use this model"
    )]
    pub generation_model: Option<CliGenerationModel>,

    #[arg(
        long = "disable-telemetry",
        env = "WREN_DISABLE_TELEMETRY",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Disable anonymous usage statistics for this run"
    )]
    pub disable_telemetry: bool,

    #[arg(
        long = "docker-bin",
        env = "WREN_DOCKER_BIN",
        default_value = "docker",
        help = "Docker CLI executable name or path"
    )]
    pub docker_bin: String,

    #[arg(
        long = "runtime-retry-interval-ms",
        env = "WREN_RUNTIME_RETRY_INTERVAL_MS",
        default_value_t = 5_000,
        value_parser = parse_positive_u64,
        help = "Delay between container runtime reachability probes"
    )]
    pub runtime_retry_interval_ms: u64,

    #[arg(
        long = "poll-interval-ms",
        env = "WREN_POLL_INTERVAL_MS",
        default_value_t = 5_000,
        value_parser = parse_positive_u64,
        help = "Delay between service readiness probes"
    )]
    pub poll_interval_ms: u64,

    #[arg(
        long = "readiness-timeout-ms",
        env = "WREN_READINESS_TIMEOUT_MS",
        default_value_t = 120_000,
        value_parser = parse_positive_u64,
        help = "Shared deadline for the UI and AI services to report ready"
    )]
    pub readiness_timeout_ms: u64,

    #[arg(
        long = "probe-timeout-ms",
        env = "WREN_PROBE_TIMEOUT_MS",
        default_value_t = 5_000,
        value_parser = parse_positive_u64,
        help = "Per-call timeout for runtime and readiness probes"
    )]
    pub probe_timeout_ms: u64,

    #[arg(
        long = "open-browser",
        env = "WREN_OPEN_BROWSER",
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Open the default browser at the UI once the stack is healthy"
    )]
    pub open_browser: bool,

    #[arg(
        long = "pause-on-exit",
        env = "WREN_PAUSE_ON_EXIT",
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Wait for Enter before exiting so the final message stays readable"
    )]
    pub pause_on_exit: bool,

    #[arg(
        long = "report-json",
        default_value_t = false,
        help = "Print the launch report as JSON after the run"
    )]
    pub report_json: bool,
}
