//! Foundational types shared across the Wren launcher crates.
//!
//! Provides the launcher error taxonomy, the resolved launch configuration,
//! atomic artifact writes, and the clock abstraction used by polling loops.

pub mod atomic_io;
pub mod clock;
pub mod error;
pub mod launch_types;

pub use atomic_io::{write_text_atomic, WriteAction};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::LauncherError;
pub use launch_types::{
    validate_openai_api_key, Configuration, GenerationModel, LlmProvider, PortAssignment,
    ProjectDirectory, EXTERNAL_ENV_FILE_NAME, OPENAI_API_KEY_PREFIX,
};
