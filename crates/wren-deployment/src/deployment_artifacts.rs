use std::path::PathBuf;

use minijinja::{context, AutoEscape, Environment};
use wren_core::{
    write_text_atomic, Configuration, GenerationModel, LauncherError, LlmProvider,
    PortAssignment, ProjectDirectory, WriteAction,
};

const ENV_TEMPLATE_NAME: &str = "wren.env";
const COMPOSE_TEMPLATE_NAME: &str = "docker-compose.yaml";
const ENV_TEMPLATE: &str = include_str!("../templates/wren.env.j2");
const COMPOSE_TEMPLATE: &str = include_str!("../templates/docker-compose.yaml.j2");

#[derive(Debug, Clone, PartialEq, Eq)]
/// Public struct `ProvisionedArtifact` describing one written file.
pub struct ProvisionedArtifact {
    pub path: PathBuf,
    pub action: WriteAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Public struct `ProvisionedArtifacts` returned by [`provision_artifacts`].
pub struct ProvisionedArtifacts {
    pub env_file: ProvisionedArtifact,
    pub compose_file: ProvisionedArtifact,
}

fn template_environment() -> Result<Environment<'static>, LauncherError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.add_template(ENV_TEMPLATE_NAME, ENV_TEMPLATE)
        .map_err(template_error)?;
    env.add_template(COMPOSE_TEMPLATE_NAME, COMPOSE_TEMPLATE)
        .map_err(template_error)?;
    Ok(env)
}

fn template_error(error: minijinja::Error) -> LauncherError {
    LauncherError::Unexpected(format!("artifact template error: {error}"))
}

/// Renders the `.env` file body. Pure function of its inputs.
pub fn render_env_file(
    config: &Configuration,
    ports: &PortAssignment,
    project_dir: &ProjectDirectory,
) -> Result<String, LauncherError> {
    let env = template_environment()?;
    let template = env
        .get_template(ENV_TEMPLATE_NAME)
        .map_err(template_error)?;
    template
        .render(context! {
            project_dir => project_dir.path().display().to_string(),
            provider => config.provider.as_str(),
            api_key => config.api_key.as_deref().unwrap_or_default(),
            generation_model => config
                .generation_model
                .map(GenerationModel::as_str)
                .unwrap_or_default(),
            ui_port => ports.ui,
            ai_port => ports.ai,
            telemetry_enabled => config.telemetry_enabled,
        })
        .map_err(template_error)
}

/// Renders the compose descriptor; the AI service also loads `.env.ai` for custom providers.
pub fn render_compose_file(config: &Configuration) -> Result<String, LauncherError> {
    let env = template_environment()?;
    let template = env
        .get_template(COMPOSE_TEMPLATE_NAME)
        .map_err(template_error)?;
    template
        .render(context! {
            custom_provider => config.provider == LlmProvider::Custom,
        })
        .map_err(template_error)
}

/// Writes both artifacts into the project directory with overwrite semantics.
pub fn provision_artifacts(
    config: &Configuration,
    ports: &PortAssignment,
    project_dir: &ProjectDirectory,
) -> Result<ProvisionedArtifacts, LauncherError> {
    let env_body = render_env_file(config, ports, project_dir)?;
    let compose_body = render_compose_file(config)?;

    let env_path = project_dir.env_file();
    let env_action = write_text_atomic(&env_path, &env_body).map_err(LauncherError::filesystem)?;
    let compose_path = project_dir.compose_file();
    let compose_action =
        write_text_atomic(&compose_path, &compose_body).map_err(LauncherError::filesystem)?;

    tracing::info!(
        env_file = %env_path.display(),
        env_action = env_action.as_str(),
        compose_file = %compose_path.display(),
        compose_action = compose_action.as_str(),
        "deployment artifacts provisioned"
    );

    Ok(ProvisionedArtifacts {
        env_file: ProvisionedArtifact {
            path: env_path,
            action: env_action,
        },
        compose_file: ProvisionedArtifact {
            path: compose_path,
            action: compose_action,
        },
    })
}
