//! Process runtime: startup wiring, server mode and graceful shutdown

pub mod lifetime;
pub mod modes;
