//! Deployment artifacts for the local Wren AI stack.
//!
//! Resolves host ports and renders the compose descriptor and environment
//! file into the project directory.

pub mod deployment_artifacts;
pub mod deployment_ports;

pub use deployment_artifacts::*;
pub use deployment_ports::*;
