//! Link management service
//!
//! Create, list and delete links inside the caller's namespace. Every
//! operation requires an authenticated identity; ownership misses on delete
//! are reported as plain not-found so other users' codes are never revealed.

use std::sync::Arc;

use tracing::{info, warn};

use super::code_allocator::CodeAllocator;
use super::identity::Identity;
use super::stats::StatsAggregator;
use crate::errors::{Result, ShortspaceError};
use crate::storage::{LinkRecord, LinkStats, NewLink, SeaOrmStorage};
use crate::utils::url_validator::normalize_and_validate;

// ============ Request/Response DTOs ============

/// Request to create a new link
#[derive(Debug, Clone, Default)]
pub struct CreateLinkRequest {
    /// Destination as typed by the user; normalized before storing
    pub url: String,
    /// Custom short code; empty or blank means "generate one"
    pub custom_code: Option<String>,
}

impl CreateLinkRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            custom_code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.custom_code = Some(code.into());
        self
    }

    fn custom_code(&self) -> Option<&str> {
        self.custom_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Result of link creation
#[derive(Debug, Clone)]
pub struct LinkCreateResult {
    pub link: LinkRecord,
    /// false when the owner already had a link to the same URL
    pub created: bool,
}

/// Result of link deletion
#[derive(Debug, Clone)]
pub struct LinkDeleteResult {
    pub deleted: LinkRecord,
    /// Namespace statistics after the removal
    pub stats: LinkStats,
}

/// Links of one namespace together with its statistics
#[derive(Debug, Clone)]
pub struct LinkListing {
    pub links: Vec<LinkRecord>,
    pub stats: LinkStats,
}

fn require_identity(identity: Option<&Identity>) -> Result<&Identity> {
    identity.ok_or_else(|| ShortspaceError::unauthenticated("Authentication required"))
}

// ============ LinkService Implementation ============

pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    allocator: CodeAllocator,
    stats: StatsAggregator,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>, allocator: CodeAllocator) -> Self {
        Self {
            stats: StatsAggregator::new(storage.clone()),
            storage,
            allocator,
        }
    }

    /// Service with the default random code generator
    pub fn from_storage(storage: Arc<SeaOrmStorage>) -> Self {
        let allocator = CodeAllocator::new(storage.clone());
        Self::new(storage, allocator)
    }

    /// Create a short link, or return the owner's existing one for the same URL
    pub async fn create_link(
        &self,
        identity: Option<&Identity>,
        req: CreateLinkRequest,
    ) -> Result<LinkCreateResult> {
        let identity = require_identity(identity)?;

        let original_url =
            normalize_and_validate(&req.url).map_err(|e| ShortspaceError::invalid_url(e.to_string()))?;

        // 同一用户同一地址只保留一条
        if let Some(existing) = self
            .storage
            .find_by_owner_url(&identity.user_id, &original_url)
            .await?
        {
            info!(
                "LinkService: reusing '{}' for {} (owner {})",
                existing.code, original_url, identity.user_id
            );
            return Ok(LinkCreateResult {
                link: existing,
                created: false,
            });
        }

        let namespace = identity.namespace();
        let new_link = |code: String| NewLink {
            owner_id: identity.user_id.clone(),
            namespace: namespace.clone(),
            original_url: original_url.clone(),
            code,
        };

        let link = match req.custom_code() {
            Some(custom) => {
                let code = self.allocator.claim_custom(&namespace, custom).await?;
                self.storage.insert_link(new_link(code)).await?
            }
            None => {
                self.allocator
                    .insert_generated(&namespace, |code| self.storage.insert_link(new_link(code)))
                    .await?
            }
        };

        info!(
            "LinkService: created link '{}' -> '{}' in {}",
            link.code, link.original_url, link.namespace
        );

        Ok(LinkCreateResult {
            link,
            created: true,
        })
    }

    /// Delete one of the caller's links and return fresh statistics
    pub async fn delete_link(
        &self,
        identity: Option<&Identity>,
        code: &str,
    ) -> Result<LinkDeleteResult> {
        let identity = require_identity(identity)?;
        let code = code.trim();

        let deleted = if code.is_empty() {
            None
        } else {
            self.storage.delete_owned(&identity.user_id, code).await?
        };

        let Some(deleted) = deleted else {
            warn!(
                "LinkService: delete of '{}' by {} matched nothing",
                code, identity.user_id
            );
            return Err(ShortspaceError::not_found(format!(
                "Short link not found: {}",
                code
            )));
        };

        let stats = self.stats.stats(&identity.namespace()).await?;
        info!(
            "LinkService: deleted link '{}' (owner {})",
            deleted.code, identity.user_id
        );

        Ok(LinkDeleteResult { deleted, stats })
    }

    /// All links in the caller's namespace, newest first
    pub async fn list_links(&self, identity: Option<&Identity>) -> Result<LinkListing> {
        let identity = require_identity(identity)?;
        let namespace = identity.namespace();

        let links = self.storage.list_links(&namespace).await?;
        let stats = self.stats.stats(&namespace).await?;
        Ok(LinkListing { links, stats })
    }

    /// Statistics of the caller's namespace
    pub async fn stats(&self, identity: Option<&Identity>) -> Result<LinkStats> {
        let identity = require_identity(identity)?;
        self.stats.stats(&identity.namespace()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_custom_code_means_generate() {
        assert_eq!(CreateLinkRequest::new("a.io").custom_code(), None);
        assert_eq!(CreateLinkRequest::new("a.io").with_code("").custom_code(), None);
        assert_eq!(CreateLinkRequest::new("a.io").with_code("   ").custom_code(), None);
        assert_eq!(
            CreateLinkRequest::new("a.io").with_code("mine").custom_code(),
            Some("mine")
        );
        assert_eq!(
            CreateLinkRequest::new("a.io").with_code(" mine ").custom_code(),
            Some("mine")
        );
    }

    #[test]
    fn test_require_identity() {
        assert!(matches!(
            require_identity(None),
            Err(ShortspaceError::Unauthenticated(_))
        ));
        let id = Identity::new("u1", "a@b.io");
        assert_eq!(require_identity(Some(&id)).unwrap().user_id, "u1");
    }
}
