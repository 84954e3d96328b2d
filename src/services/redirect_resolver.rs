//! Redirect resolution with visit accounting

use std::sync::Arc;

use tracing::{debug, trace};

use crate::errors::{Result, ShortspaceError};
use crate::storage::{ResolvedLink, SeaOrmStorage};
use crate::utils::is_valid_short_code;

pub struct RedirectResolver {
    storage: Arc<SeaOrmStorage>,
}

impl RedirectResolver {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 全局解析短码并计一次访问
    ///
    /// 未知短码返回 NotFound，且不修改任何记录
    pub async fn resolve(&self, code: &str) -> Result<ResolvedLink> {
        if !is_valid_short_code(code) {
            trace!("Rejected malformed short code: {:?}", code);
            return Err(not_found(code));
        }

        match self.storage.record_visit(code).await? {
            Some(link) => {
                debug!("Redirect {} -> {}", link.code, link.original_url);
                Ok(link)
            }
            None => Err(not_found(code)),
        }
    }

    /// 在指定用户的命名空间内解析（`/{owner_id}/{code}`）
    pub async fn resolve_scoped(&self, owner_id: &str, code: &str) -> Result<ResolvedLink> {
        if owner_id.is_empty() || !is_valid_short_code(code) {
            return Err(not_found(code));
        }

        match self.storage.record_scoped_visit(owner_id, code).await? {
            Some(link) => {
                debug!(
                    "Scoped redirect {}/{} -> {}",
                    owner_id, link.code, link.original_url
                );
                Ok(link)
            }
            None => Err(not_found(code)),
        }
    }
}

fn not_found(code: &str) -> ShortspaceError {
    ShortspaceError::not_found(format!("Short link not found: {}", code))
}
