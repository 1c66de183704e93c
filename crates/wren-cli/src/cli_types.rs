use clap::ValueEnum;

use wren_core::{GenerationModel, LlmProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliLlmProvider {
    #[value(name = "openai")]
    OpenAi,
    Custom,
}

impl From<CliLlmProvider> for LlmProvider {
    fn from(value: CliLlmProvider) -> Self {
        match value {
            CliLlmProvider::OpenAi => LlmProvider::OpenAi,
            CliLlmProvider::Custom => LlmProvider::Custom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliGenerationModel {
    #[value(name = "gpt-4o")]
    Gpt4o,
    #[value(name = "gpt-4-turbo")]
    Gpt4Turbo,
    #[value(name = "gpt-3.5-turbo")]
    Gpt35Turbo,
}

impl From<CliGenerationModel> for GenerationModel {
    fn from(value: CliGenerationModel) -> Self {
        match value {
            CliGenerationModel::Gpt4o => GenerationModel::Gpt4o,
            CliGenerationModel::Gpt4Turbo => GenerationModel::Gpt4Turbo,
            CliGenerationModel::Gpt35Turbo => GenerationModel::Gpt35Turbo,
        }
    }
}
