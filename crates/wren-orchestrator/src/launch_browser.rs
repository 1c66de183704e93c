use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

/// Trait contract for handing the UI URL to the operator's browser.
pub trait BrowserOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// Platform command that opens `url` in the default browser.
pub fn browser_command(os: &str, url: &str) -> Option<(&'static str, Vec<String>)> {
    match os {
        "macos" => Some(("open", vec![url.to_string()])),
        "windows" => Some((
            "rundll32",
            vec!["url.dll,FileProtocolHandler".to_string(), url.to_string()],
        )),
        "linux" | "freebsd" | "openbsd" | "netbsd" => Some(("xdg-open", vec![url.to_string()])),
        _ => None,
    }
}

/// Opens URLs with the operating system's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        let Some((program, args)) = browser_command(std::env::consts::OS, url) else {
            bail!("unsupported platform {}", std::env::consts::OS);
        };
        let status = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("failed to run {program}"))?;
        if !status.success() {
            bail!("{program} exited with status {status}");
        }
        Ok(())
    }
}
