//! Onboarding steps for the Wren launcher.
//!
//! Prepares the persistent project directory and collects the operator's LLM
//! provider, credential, model, and telemetry choices through an
//! [`OperatorConsole`].

pub mod onboarding_config;
pub mod onboarding_console;
pub mod onboarding_project_dir;
pub mod onboarding_telemetry;

pub use onboarding_config::*;
pub use onboarding_console::*;
pub use onboarding_project_dir::*;
pub use onboarding_telemetry::*;
