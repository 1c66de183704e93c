use std::path::Path;

use anyhow::{bail, Context, Result};

/// Outcome of an artifact write, reported back to the operator log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Created,
    Updated,
    Unchanged,
}

impl WriteAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Writes text using a temp file + rename so readers never observe partial data.
///
/// A destination that already holds exactly `content` is left untouched.
pub fn write_text_atomic(path: &Path, content: &str) -> Result<WriteAction> {
    if path.as_os_str().is_empty() {
        bail!("destination path cannot be empty");
    }
    if path.is_dir() {
        bail!("destination path '{}' is a directory", path.display());
    }

    let existing = match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
        Err(error) => {
            return Err(error).with_context(|| format!("failed to read {}", path.display()))
        }
    };
    if existing.as_deref() == Some(content.as_bytes()) {
        return Ok(WriteAction::Unchanged);
    }

    let parent_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent_dir)
        .with_context(|| format!("failed to create {}", parent_dir.display()))?;

    let temp_name = format!(
        ".{}.tmp-{}",
        path.file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("artifact"),
        std::process::id()
    );
    let temp_path = parent_dir.join(temp_name);
    std::fs::write(&temp_path, content)
        .with_context(|| format!("failed to write temporary file {}", temp_path.display()))?;
    std::fs::rename(&temp_path, path).with_context(|| {
        format!(
            "failed to rename temporary file {} to {}",
            temp_path.display(),
            path.display()
        )
    })?;

    Ok(if existing.is_some() {
        WriteAction::Updated
    } else {
        WriteAction::Created
    })
}

#[cfg(test)]
mod tests {
    use super::{write_text_atomic, WriteAction};
    use tempfile::tempdir;

    #[test]
    fn functional_write_text_atomic_overwrites_changed_content() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("docker-compose.yaml");
        write_text_atomic(&path, "services: {}\n").expect("seed");
        let action = write_text_atomic(&path, "services:\n  wren-ui: {}\n").expect("overwrite");
        assert_eq!(action, WriteAction::Updated);
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "services:\n  wren-ui: {}\n"
        );
    }

    #[test]
    fn regression_write_text_atomic_rejects_directory_destination() {
        let temp = tempdir().expect("tempdir");
        let error = write_text_atomic(temp.path(), "x").expect_err("directory should fail");
        assert!(error.to_string().contains("is a directory"));
    }

    #[test]
    fn regression_write_text_atomic_leaves_no_temp_file_behind() {
        let temp = tempdir().expect("tempdir");
        write_text_atomic(&temp.path().join(".env"), "A=1\n").expect("write");
        let names = std::fs::read_dir(temp.path())
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec![std::ffi::OsString::from(".env")]);
    }
}
