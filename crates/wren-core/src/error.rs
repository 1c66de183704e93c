use std::path::PathBuf;

use thiserror::Error;

const CUSTOM_LLM_DOCS_URL: &str = "https://docs.getwren.ai/installation/custom_llm#running-wren-ai-with-your-custom-llm-or-document-store";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Enumerates every terminal failure a launch can end with.
pub enum LauncherError {
    #[error("filesystem error: {0}")]
    Filesystem(String),
    #[error("prompt aborted: {0}")]
    UserAbort(String),
    #[error(
        "please create a .env.ai file at {} first, more details at {}",
        .path.display(),
        CUSTOM_LLM_DOCS_URL
    )]
    MissingExternalConfig { path: PathBuf },
    #[error("container runtime unavailable: {0}")]
    RuntimeUnavailable(String),
    #[error("no free port at or above {start}")]
    NoFreePort { start: u16 },
    #[error("failed to launch the stack: {0}")]
    Launch(String),
    #[error("{target} service did not become ready before the deadline")]
    Timeout { target: String },
    #[error("unexpected fault: {0}")]
    Unexpected(String),
}

impl LauncherError {
    /// Wraps an `anyhow` chain, keeping every context layer in the message.
    pub fn filesystem(error: anyhow::Error) -> Self {
        Self::Filesystem(format!("{error:#}"))
    }

    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Filesystem(_) => "filesystem_error",
            Self::UserAbort(_) => "user_abort",
            Self::MissingExternalConfig { .. } => "missing_external_config",
            Self::RuntimeUnavailable(_) => "runtime_unavailable",
            Self::NoFreePort { .. } => "no_free_port",
            Self::Launch(_) => "launch_error",
            Self::Timeout { .. } => "timeout_error",
            Self::Unexpected(_) => "unexpected_fault",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LauncherError;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn unit_missing_external_config_names_expected_path() {
        let error = LauncherError::MissingExternalConfig {
            path: PathBuf::from("/home/op/.wrenai/.env.ai"),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("/home/op/.wrenai/.env.ai"));
        assert_eq!(error.reason_code(), "missing_external_config");
    }

    #[test]
    fn unit_filesystem_keeps_context_chain() {
        let source: anyhow::Result<()> =
            Err(std::io::Error::other("disk full")).context("failed to create /x/.wrenai");
        let error = LauncherError::filesystem(source.expect_err("error"));
        assert_eq!(
            error.to_string(),
            "filesystem error: failed to create /x/.wrenai: disk full"
        );
    }

    #[test]
    fn unit_timeout_names_target() {
        let error = LauncherError::Timeout {
            target: "UI".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "UI service did not become ready before the deadline"
        );
    }
}
