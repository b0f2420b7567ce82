//! CLI command handlers
//!
//! This module contains all CLI-related functionality including:
//! - Argument parsing structures
//! - Shared input resolution (filters, run ids, job selection)
//! - Command implementations

pub mod args;
pub mod commands;
pub mod params;
pub mod router;

// Re-export the main CLI structures for convenience
pub use args::{Cli, Commands, JobSelection, RenderFormat};
pub use router::execute_command;
