pub mod config;
pub mod resolve;
pub mod utils;

pub use config::{handle_config_command, ConfigCommands};
pub use resolve::{handle_resolve_command, ResolveOptions};
