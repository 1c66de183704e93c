use std::path::{Path, PathBuf};

use serde::Serialize;

pub const OPENAI_API_KEY_PREFIX: &str = "sk-";
pub const EXTERNAL_ENV_FILE_NAME: &str = ".env.ai";
const PROJECT_DIR_NAME: &str = ".wrenai";
const ENV_FILE_NAME: &str = ".env";
const COMPOSE_FILE_NAME: &str = "docker-compose.yaml";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
/// Enumerates supported `LlmProvider` values.
pub enum LlmProvider {
    OpenAi,
    Custom,
}

impl LlmProvider {
    pub const ALL: [LlmProvider; 2] = [LlmProvider::OpenAi, LlmProvider::Custom];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
/// Enumerates the generation models offered for the managed provider.
pub enum GenerationModel {
    Gpt4o,
    Gpt4Turbo,
    Gpt35Turbo,
}

impl GenerationModel {
    pub const ALL: [GenerationModel; 3] = [
        GenerationModel::Gpt4o,
        GenerationModel::Gpt4Turbo,
        GenerationModel::Gpt35Turbo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4Turbo => "gpt-4-turbo",
            Self::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }
}

/// Resolved operator choices for one launch.
///
/// Either `provider` is `OpenAi` with both `api_key` and `generation_model`
/// present, or it is `Custom` and the external env file was verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub provider: LlmProvider,
    pub api_key: Option<String>,
    pub generation_model: Option<GenerationModel>,
    pub telemetry_enabled: bool,
}

/// Host ports chosen for the UI and the AI service.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PortAssignment {
    pub ui: u16,
    pub ai: u16,
}

impl PortAssignment {
    pub fn ui_url(&self) -> String {
        format!("http://localhost:{}", self.ui)
    }
}

/// The persistent launcher state directory, `<home>/.wrenai`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDirectory {
    path: PathBuf,
}

impl ProjectDirectory {
    pub fn under_home(home_dir: &Path) -> Self {
        Self {
            path: home_dir.join(PROJECT_DIR_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn env_file(&self) -> PathBuf {
        self.path.join(ENV_FILE_NAME)
    }

    pub fn compose_file(&self) -> PathBuf {
        self.path.join(COMPOSE_FILE_NAME)
    }

    pub fn external_env_file(&self) -> PathBuf {
        self.path.join(EXTERNAL_ENV_FILE_NAME)
    }
}

/// Format check for managed-provider API keys. Authenticity is not checked.
pub fn validate_openai_api_key(raw: &str) -> Result<(), String> {
    if raw.trim().starts_with(OPENAI_API_KEY_PREFIX) {
        Ok(())
    } else {
        Err("invalid API key".to_string())
    }
}
