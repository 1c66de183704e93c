use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use wren_core::{LauncherError, ProjectDirectory};

/// Returns the explicit override when given, otherwise the OS user home.
pub fn resolve_home_dir(home_override: Option<&Path>) -> Result<PathBuf, LauncherError> {
    if let Some(path) = home_override {
        return Ok(path.to_path_buf());
    }
    dirs::home_dir().ok_or_else(|| {
        LauncherError::filesystem(anyhow!("unable to determine the user home directory"))
    })
}

/// Creates `<home>/.wrenai` when missing. Existing directories are reused as-is.
pub fn ensure_project_dir(home_dir: &Path) -> Result<ProjectDirectory, LauncherError> {
    let project = ProjectDirectory::under_home(home_dir);
    let path = project.path();
    if path.is_dir() {
        tracing::debug!(project_dir = %path.display(), "project directory already present");
        return Ok(project);
    }
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create project directory {}", path.display()))
        .map_err(LauncherError::filesystem)?;
    tracing::info!(project_dir = %path.display(), "created project directory");
    Ok(project)
}
