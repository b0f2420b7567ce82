//! Command implementation modules
//!
//! Each command is implemented as a separate module.

pub mod list;
pub mod render;
pub mod run;

// Re-export command execution functions
pub use list::run_list_command;
pub use render::run_render_command;
pub use run::run_aggregation_command;
