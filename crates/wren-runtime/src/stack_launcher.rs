use wren_core::{LauncherError, LlmProvider, ProjectDirectory};

use crate::docker_runtime::{ComposeUpSpec, ContainerRuntime};

/// Brings the compose project up once; retries are left to the operator.
pub struct StackLauncher<'a> {
    runtime: &'a dyn ContainerRuntime,
}

impl<'a> StackLauncher<'a> {
    pub fn new(runtime: &'a dyn ContainerRuntime) -> Self {
        Self { runtime }
    }

    pub fn up(
        &self,
        project_name: &str,
        project_dir: &ProjectDirectory,
        provider: LlmProvider,
    ) -> Result<(), LauncherError> {
        let spec = ComposeUpSpec::for_project(project_name, project_dir, provider);
        tracing::info!(
            project_name,
            env_files = spec.env_files.len(),
            "launching compose project"
        );
        self.runtime.compose_up(&spec).map_err(|error| match error {
            LauncherError::Launch(_) => error,
            other => LauncherError::Launch(other.to_string()),
        })
    }
}
