//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod completions;
pub mod config;
pub mod inspect;
pub mod list_types;
pub mod process;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use inspect::InspectArgs;
pub use list_types::ListTypesArgs;
pub use process::ProcessArgs;
