//! Launch sequencing for the Wren launcher.
//!
//! Drives the fixed phase order from directory preparation to opening the
//! browser and reports a single [`LaunchReport`] per run.

pub mod launch_browser;
pub mod launch_orchestrator;

pub use launch_browser::*;
pub use launch_orchestrator::*;
