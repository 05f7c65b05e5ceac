//! CLI command handlers. Each command is in its own file.

mod config;
mod name;
mod run;

pub use config::run_config;
pub use name::run_name;
pub use run::{run_session, RunOverrides};
