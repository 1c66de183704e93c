use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use wren_core::{Clock, LauncherError};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A service endpoint polled until it answers.
pub struct HealthTarget {
    pub label: String,
    pub url: String,
}

impl HealthTarget {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn ui(port: u16) -> Self {
        Self::new("UI", format!("http://localhost:{port}"))
    }

    pub fn ai(port: u16) -> Self {
        Self::new("AI", format!("http://localhost:{port}/health"))
    }
}

/// Trait contract for a single readiness check. Any error means "not ready yet".
pub trait ReadinessProbe {
    fn probe(&self, target: &HealthTarget) -> Result<()>;
}

/// HTTP GET probe; a 2xx response means ready.
pub struct HttpReadinessProbe {
    client: Client,
}

impl HttpReadinessProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build readiness probe http client")?;
        Ok(Self { client })
    }
}

impl ReadinessProbe for HttpReadinessProbe {
    fn probe(&self, target: &HealthTarget) -> Result<()> {
        let response = self
            .client
            .get(&target.url)
            .send()
            .with_context(|| format!("request to {} failed", target.url))?;
        let status = response.status();
        if !status.is_success() {
            bail!("{} answered with status {}", target.url, status.as_u16());
        }
        Ok(())
    }
}

/// Fixed-interval readiness loop against an absolute deadline.
pub struct HealthPoller<'a> {
    probe: &'a dyn ReadinessProbe,
    clock: &'a dyn Clock,
    interval: Duration,
}

impl<'a> HealthPoller<'a> {
    pub fn new(probe: &'a dyn ReadinessProbe, clock: &'a dyn Clock, interval: Duration) -> Self {
        Self {
            probe,
            clock,
            interval,
        }
    }

    /// Returns the number of probes issued once `target` answers.
    ///
    /// The deadline is checked before every probe, so a probe issued exactly
    /// at the deadline still counts.
    pub fn wait_until_ready(
        &self,
        target: &HealthTarget,
        deadline: Instant,
    ) -> Result<u64, LauncherError> {
        let mut probes = 0_u64;
        loop {
            if self.clock.now() > deadline {
                tracing::info!(target = %target.label, probes, "readiness deadline passed");
                return Err(LauncherError::Timeout {
                    target: target.label.clone(),
                });
            }
            probes = probes.saturating_add(1);
            match self.probe.probe(target) {
                Ok(()) => {
                    tracing::info!(target = %target.label, probes, "service is ready");
                    return Ok(probes);
                }
                Err(error) => {
                    tracing::debug!(
                        target = %target.label,
                        url = %target.url,
                        attempt = probes,
                        error = %format!("{error:#}"),
                        "service not ready yet"
                    );
                }
            }
            self.clock.sleep(self.interval);
        }
    }
}
