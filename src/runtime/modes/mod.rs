//! Mode routing
//!
//! 目前只有 HTTP 服务模式

pub mod server;

pub use server::run_server;
