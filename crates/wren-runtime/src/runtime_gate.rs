use std::time::Duration;

use wren_core::{Clock, LauncherError};

use crate::docker_runtime::ContainerRuntime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates the gate's knowledge of the container runtime.
pub enum RuntimeGateState {
    Unknown,
    Running,
}

/// Blocks until the container runtime answers, starting it when it does not.
///
/// There is no deadline: an unreachable runtime whose start action keeps
/// succeeding is re-probed forever at `retry_interval`. The only terminal
/// failure is a start action error.
pub struct RuntimeReadinessGate<'a> {
    runtime: &'a dyn ContainerRuntime,
    clock: &'a dyn Clock,
    retry_interval: Duration,
    state: RuntimeGateState,
    attempts: u64,
}

impl<'a> RuntimeReadinessGate<'a> {
    pub fn new(
        runtime: &'a dyn ContainerRuntime,
        clock: &'a dyn Clock,
        retry_interval: Duration,
    ) -> Self {
        Self {
            runtime,
            clock,
            retry_interval,
            state: RuntimeGateState::Unknown,
            attempts: 0,
        }
    }

    pub fn state(&self) -> RuntimeGateState {
        self.state
    }

    /// Reachability probes issued so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// `on_start_attempt` is called with the probe count before each start action.
    pub fn ensure_running(
        &mut self,
        mut on_start_attempt: impl FnMut(u64),
    ) -> Result<(), LauncherError> {
        if self.state == RuntimeGateState::Running {
            return Ok(());
        }
        loop {
            self.attempts = self.attempts.saturating_add(1);
            tracing::debug!(attempt = self.attempts, "probing container runtime");
            if self.runtime.is_reachable() {
                self.state = RuntimeGateState::Running;
                tracing::info!(attempts = self.attempts, "container runtime is running");
                return Ok(());
            }

            on_start_attempt(self.attempts);
            self.runtime.start().map_err(|error| match error {
                LauncherError::RuntimeUnavailable(_) => error,
                other => LauncherError::RuntimeUnavailable(other.to_string()),
            })?;
            tracing::info!(
                attempt = self.attempts,
                retry_in = ?self.retry_interval,
                "container runtime start requested"
            );
            self.clock.sleep(self.retry_interval);
        }
    }
}
