//! Shortspace - URL shortener core
//!
//! Authenticated users create short links inside their own namespace;
//! anonymous visitors are redirected and every visit is counted exactly once.
//!
//! # Architecture
//! - `storage`: SeaORM link/user store with bounded, retried operations
//! - `services`: identity, code allocation, link lifecycle, redirects, stats
//! - `api`: actix-web handlers, bearer auth middleware and JWT
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: startup wiring, server mode and graceful shutdown
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
