//! Service layer for business logic
//!
//! HTTP handlers stay thin; everything that touches links, codes or users
//! goes through these services.

mod code_allocator;
mod identity;
mod link_service;
mod redirect_resolver;
mod stats;
mod user_service;

pub use code_allocator::*;
pub use identity::Identity;
pub use link_service::*;
pub use redirect_resolver::RedirectResolver;
pub use stats::{RECENT_WINDOW_HOURS, StatsAggregator};
pub use user_service::*;
