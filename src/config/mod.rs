//! Static configuration
//!
//! Loaded once at startup from an optional TOML file and `SHORTSPACE__*`
//! environment variables, then shared through a lock-free global handle.

mod r#impl;
mod structs;

pub use r#impl::{get_config, init_config, init_config_from, try_get_config, update_config};
pub use structs::*;
