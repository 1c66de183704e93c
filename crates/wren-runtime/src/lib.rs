//! Container runtime control and service readiness for the Wren AI stack.
//!
//! `docker_runtime` talks to the Docker CLI, `runtime_gate` waits for the
//! daemon, `stack_launcher` brings the compose project up and
//! `health_poller` waits for the UI and AI services to answer.

pub mod docker_runtime;
pub mod health_poller;
pub mod runtime_gate;
pub mod stack_launcher;

pub use docker_runtime::*;
pub use health_poller::*;
pub use runtime_gate::*;
pub use stack_launcher::*;
