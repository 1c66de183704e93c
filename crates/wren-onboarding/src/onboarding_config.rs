use wren_cli::Cli;
use wren_core::{
    validate_openai_api_key, Configuration, GenerationModel, LauncherError, LlmProvider,
    ProjectDirectory,
};

use crate::onboarding_console::{prompt_until_valid, select_item, OperatorConsole, PromptError};
use crate::onboarding_telemetry::evaluate_telemetry_preferences;

const CUSTOM_LLM_DOCS_URL: &str = "https://docs.getwren.ai/installation/custom_llm#running-wren-ai-with-your-custom-llm-or-document-store";
const OPENAI_KEY_PERMISSIONS_URL: &str =
    "https://help.openai.com/en/articles/8867743-assign-api-key-permissions";
const OPENAI_MODELS_URL: &str = "https://platform.openai.com/docs/models/models";

/// Answers supplied up front; each one present skips its prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPresets {
    pub provider: Option<LlmProvider>,
    pub api_key: Option<String>,
    pub generation_model: Option<GenerationModel>,
}

impl ConfigPresets {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            provider: cli.llm_provider.map(Into::into),
            api_key: cli.openai_api_key.clone(),
            generation_model: cli.generation_model.map(Into::into),
        }
    }
}

fn abort(step: &str, error: PromptError) -> LauncherError {
    LauncherError::UserAbort(format!("{step}: {error}"))
}

pub fn ask_for_llm_provider(
    console: &mut dyn OperatorConsole,
) -> Result<LlmProvider, LauncherError> {
    console.notice("Please provide the LLM provider you want to use");
    console.notice(&format!(
        "You can learn more about how to set up custom LLMs at {CUSTOM_LLM_DOCS_URL}"
    ));
    let labels = LlmProvider::ALL.map(LlmProvider::as_str);
    let index = select_item(console, "Select an LLM provider", &labels)
        .map_err(|error| abort("LLM provider selection", error))?;
    Ok(LlmProvider::ALL[index])
}

pub fn ask_for_api_key(console: &mut dyn OperatorConsole) -> Result<String, LauncherError> {
    console.notice("Please provide your OpenAI API key");
    console.notice(&format!(
        "Please use the key with full permission, more details at {OPENAI_KEY_PERMISSIONS_URL}"
    ));
    prompt_until_valid(console, "OpenAI API key: ", true, validate_openai_api_key)
        .map_err(|error| abort("OpenAI API key", error))
}

pub fn ask_for_generation_model(
    console: &mut dyn OperatorConsole,
) -> Result<GenerationModel, LauncherError> {
    console.notice("Please provide the generation model you want to use");
    console.notice(&format!(
        "You can learn more about OpenAI's generation models at {OPENAI_MODELS_URL}"
    ));
    let labels = GenerationModel::ALL.map(GenerationModel::as_str);
    let index = select_item(console, "Select an OpenAI generation model", &labels)
        .map_err(|error| abort("generation model selection", error))?;
    Ok(GenerationModel::ALL[index])
}

/// The custom provider is configured entirely by `<project>/.env.ai`; only its presence is checked.
pub fn verify_external_config(project_dir: &ProjectDirectory) -> Result<(), LauncherError> {
    let path = project_dir.external_env_file();
    if path.is_file() {
        return Ok(());
    }
    Err(LauncherError::MissingExternalConfig { path })
}

/// Runs the provider, credential, model, and telemetry steps in order.
pub fn collect_configuration(
    console: &mut dyn OperatorConsole,
    presets: &ConfigPresets,
    project_dir: &ProjectDirectory,
    telemetry_disabled: bool,
) -> Result<Configuration, LauncherError> {
    let provider = match presets.provider {
        Some(provider) => provider,
        None => ask_for_llm_provider(console)?,
    };

    let (api_key, generation_model) = match provider {
        LlmProvider::OpenAi => {
            let api_key = match presets.api_key.as_deref().map(str::trim) {
                Some(key) if validate_openai_api_key(key).is_ok() => key.to_string(),
                Some(_) => {
                    tracing::debug!("preset OpenAI API key rejected, prompting instead");
                    console.notice(
                        "The preset OpenAI API key does not start with sk- and was ignored",
                    );
                    ask_for_api_key(console)?
                }
                None => ask_for_api_key(console)?,
            };
            let model = match presets.generation_model {
                Some(model) => model,
                None => ask_for_generation_model(console)?,
            };
            (Some(api_key), Some(model))
        }
        LlmProvider::Custom => {
            if presets.api_key.is_some() || presets.generation_model.is_some() {
                tracing::debug!("ignoring OpenAI presets for the custom provider");
            }
            verify_external_config(project_dir)?;
            (None, None)
        }
    };

    let telemetry_enabled = evaluate_telemetry_preferences(console, telemetry_disabled);
    tracing::info!(
        provider = provider.as_str(),
        model = generation_model.map(GenerationModel::as_str).unwrap_or("-"),
        telemetry_enabled,
        "configuration collected"
    );

    Ok(Configuration {
        provider,
        api_key,
        generation_model,
        telemetry_enabled,
    })
}
