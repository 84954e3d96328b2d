//! LinkService tests
//!
//! 使用临时 SQLite 数据库测试链接创建、去重、删除和统计

use std::sync::{Arc, Once};

use shortspace::config::init_config;
use shortspace::errors::ShortspaceError;
use chrono::{Duration, Utc};
use shortspace::services::{
    CodeAllocator, CodeGenerator, CreateLinkRequest, Identity, LinkService, RedirectResolver,
    StatsAggregator,
};
use shortspace::storage::backend::SeaOrmStorage;
use shortspace::storage::{LinkStats, Namespace};
use tempfile::TempDir;

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_storage() -> (TempDir, Arc<SeaOrmStorage>) {
    init_test_config();
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("links.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("创建存储失败");
    (temp_dir, Arc::new(storage))
}

/// 固定输出同一个短码
struct FixedGenerator(&'static str);

impl CodeGenerator for FixedGenerator {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

fn alice() -> Identity {
    Identity::new("u1", "alice@example.com")
}

fn bob() -> Identity {
    Identity::new("u2", "bob@example.com")
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_requires_identity() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage);

    let err = service
        .create_link(None, CreateLinkRequest::new("example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShortspaceError::Unauthenticated(_)));
    assert_eq!(err.http_status(), 401);
}

#[tokio::test]
async fn test_create_normalizes_and_generates_code() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage);

    let result = service
        .create_link(Some(&alice()), CreateLinkRequest::new("  example.com/a  "))
        .await
        .unwrap();

    assert!(result.created);
    assert_eq!(result.link.original_url, "https://example.com/a");
    assert_eq!(result.link.visit_count, 0);
    assert_eq!(result.link.owner_id, "u1");
    assert_eq!(result.link.namespace, "urls_alice_example_com");
    assert_eq!(result.link.code.len(), 6);
    assert!(result.link.code.bytes().all(|b| b.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_create_rejects_invalid_url() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage);

    for bad in ["", "   ", "exa mple.com", "ftp://example.com", "mailto:a@b.com"] {
        let err = service
            .create_link(Some(&alice()), CreateLinkRequest::new(bad))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ShortspaceError::InvalidUrl(_)),
            "{bad:?} should be InvalidUrl, got {err:?}"
        );
        assert_eq!(err.http_status(), 400);
    }
}

#[tokio::test]
async fn test_same_url_twice_returns_same_record() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage);

    let first = service
        .create_link(Some(&alice()), CreateLinkRequest::new("example.com/dup"))
        .await
        .unwrap();
    let second = service
        .create_link(Some(&alice()), CreateLinkRequest::new("https://example.com/dup"))
        .await
        .unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.link.id, second.link.id);
    assert_eq!(first.link.code, second.link.code);

    let stats = service.stats(Some(&alice())).await.unwrap();
    assert_eq!(stats.total_links, 1);
}

#[tokio::test]
async fn test_duplicate_url_ignores_custom_code() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage);

    let first = service
        .create_link(Some(&alice()), CreateLinkRequest::new("example.com/x"))
        .await
        .unwrap();
    let second = service
        .create_link(
            Some(&alice()),
            CreateLinkRequest::new("example.com/x").with_code("another"),
        )
        .await
        .unwrap();

    assert!(!second.created);
    assert_eq!(second.link.code, first.link.code);
}

#[tokio::test]
async fn test_same_url_different_owners_are_separate() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage);

    let a = service
        .create_link(Some(&alice()), CreateLinkRequest::new("example.com/shared"))
        .await
        .unwrap();
    let b = service
        .create_link(Some(&bob()), CreateLinkRequest::new("example.com/shared"))
        .await
        .unwrap();

    assert!(a.created && b.created);
    assert_ne!(a.link.id, b.link.id);
}

#[tokio::test]
async fn test_custom_code_validation() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage);

    let err = service
        .create_link(
            Some(&alice()),
            CreateLinkRequest::new("example.com/short").with_code("ab"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ShortspaceError::InvalidCode(_)));
    assert_eq!(err.http_status(), 400);

    let ok = service
        .create_link(
            Some(&alice()),
            CreateLinkRequest::new("example.com/valid").with_code("valid_code-1"),
        )
        .await
        .unwrap();
    assert_eq!(ok.link.code, "valid_code-1");

    let padded = service
        .create_link(
            Some(&alice()),
            CreateLinkRequest::new("example.com/padded").with_code("  mine  "),
        )
        .await
        .unwrap();
    assert_eq!(padded.link.code, "mine");
}

#[tokio::test]
async fn test_custom_code_conflict_within_namespace() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage);

    service
        .create_link(
            Some(&alice()),
            CreateLinkRequest::new("example.com/1").with_code("mine"),
        )
        .await
        .unwrap();

    let err = service
        .create_link(
            Some(&alice()),
            CreateLinkRequest::new("example.com/2").with_code("mine"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ShortspaceError::CodeConflict(_)));
    assert_eq!(err.http_status(), 409);
}

#[tokio::test]
async fn test_same_custom_code_in_other_namespace_is_allowed() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage);

    let a = service
        .create_link(
            Some(&alice()),
            CreateLinkRequest::new("example.com/a").with_code("promo"),
        )
        .await
        .unwrap();
    let b = service
        .create_link(
            Some(&bob()),
            CreateLinkRequest::new("example.com/b").with_code("promo"),
        )
        .await
        .unwrap();

    assert_eq!(a.link.code, b.link.code);
    assert_ne!(a.link.namespace, b.link.namespace);
}

#[tokio::test]
async fn test_generated_code_exhaustion() {
    let (_dir, storage) = create_storage().await;
    let allocator = CodeAllocator::with_generator(storage.clone(), Arc::new(FixedGenerator("AAAAAA")));
    let service = LinkService::new(storage, allocator);

    service
        .create_link(Some(&alice()), CreateLinkRequest::new("example.com/1"))
        .await
        .unwrap();

    let err = service
        .create_link(Some(&alice()), CreateLinkRequest::new("example.com/2"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShortspaceError::AllocationExhausted(_)));
    assert_eq!(err.http_status(), 500);
}

// =============================================================================
// Delete & Stats
// =============================================================================

#[tokio::test]
async fn test_delete_foreign_link_is_not_found() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage.clone());

    let created = service
        .create_link(Some(&alice()), CreateLinkRequest::new("example.com/keep"))
        .await
        .unwrap();

    let err = service
        .delete_link(Some(&bob()), &created.link.code)
        .await
        .unwrap_err();
    assert!(matches!(err, ShortspaceError::NotFound(_)));
    assert_eq!(err.http_status(), 404);

    let still_there = storage
        .find_owned("u1", &created.link.code)
        .await
        .unwrap();
    assert_eq!(still_there.map(|l| l.id), Some(created.link.id));
}

#[tokio::test]
async fn test_delete_unknown_code_is_not_found() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage);

    for code in ["nope42", ""] {
        let err = service.delete_link(Some(&alice()), code).await.unwrap_err();
        assert!(matches!(err, ShortspaceError::NotFound(_)));
    }
    assert!(matches!(
        service.delete_link(None, "nope42").await,
        Err(ShortspaceError::Unauthenticated(_))
    ));
}

#[tokio::test]
async fn test_stats_empty_then_populated() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage.clone());
    let resolver = RedirectResolver::new(storage);

    assert_eq!(
        service.stats(Some(&alice())).await.unwrap(),
        LinkStats::default()
    );

    let mut codes = Vec::new();
    for path in ["one", "two", "three"] {
        let created = service
            .create_link(
                Some(&alice()),
                CreateLinkRequest::new(format!("example.com/{}", path)),
            )
            .await
            .unwrap();
        codes.push(created.link.code);
    }

    resolver.resolve(&codes[0]).await.unwrap();
    resolver.resolve(&codes[0]).await.unwrap();

    assert_eq!(
        service.stats(Some(&alice())).await.unwrap(),
        LinkStats {
            total_links: 3,
            total_visits: 2,
            recent_links: 3,
        }
    );

    // 其他命名空间不受影响
    assert_eq!(
        service.stats(Some(&bob())).await.unwrap(),
        LinkStats::default()
    );
}

#[tokio::test]
async fn test_recent_links_window() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage.clone());
    let stats = StatsAggregator::new(storage);
    let namespace = alice().namespace();

    service
        .create_link(Some(&alice()), CreateLinkRequest::new("example.com/recent"))
        .await
        .unwrap();

    let now = Utc::now();

    let current = stats.stats_at(&namespace, now).await.unwrap();
    assert_eq!(current.total_links, 1);
    assert_eq!(current.recent_links, 1);

    let almost = stats
        .stats_at(&namespace, now + Duration::hours(23))
        .await
        .unwrap();
    assert_eq!(almost.recent_links, 1);

    let later = stats
        .stats_at(&namespace, now + Duration::hours(25))
        .await
        .unwrap();
    assert_eq!(later.total_links, 1);
    assert_eq!(later.recent_links, 0);
}

#[tokio::test]
async fn test_shorten_resolve_delete_scenario() {
    let (_dir, storage) = create_storage().await;
    let allocator = CodeAllocator::with_generator(storage.clone(), Arc::new(FixedGenerator("abc123")));
    let service = LinkService::new(storage.clone(), allocator);
    let resolver = RedirectResolver::new(storage.clone());
    let owner = alice();

    // 另一条链接，删除后统计不应归零
    service
        .create_link(
            Some(&owner),
            CreateLinkRequest::new("example.com/other").with_code("other1"),
        )
        .await
        .unwrap();

    let created = service
        .create_link(Some(&owner), CreateLinkRequest::new("example.com/a"))
        .await
        .unwrap();
    assert_eq!(created.link.code, "abc123");

    for _ in 0..3 {
        let resolved = resolver.resolve("abc123").await.unwrap();
        assert_eq!(resolved.original_url, "https://example.com/a");
    }

    let link = storage.find_owned("u1", "abc123").await.unwrap().unwrap();
    assert_eq!(link.visit_count, 3);

    let before = service.stats(Some(&owner)).await.unwrap();
    let deleted = service.delete_link(Some(&owner), "abc123").await.unwrap();

    assert_eq!(deleted.deleted.visit_count, 3);
    assert_eq!(deleted.stats.total_links, before.total_links - 1);
    assert_eq!(deleted.stats.total_visits, before.total_visits - 3);

    assert!(matches!(
        resolver.resolve("abc123").await,
        Err(ShortspaceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_links_only_own_namespace() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage.clone());

    service
        .create_link(Some(&alice()), CreateLinkRequest::new("example.com/1"))
        .await
        .unwrap();
    service
        .create_link(Some(&alice()), CreateLinkRequest::new("example.com/2"))
        .await
        .unwrap();
    service
        .create_link(Some(&bob()), CreateLinkRequest::new("example.com/3"))
        .await
        .unwrap();

    let listing = service.list_links(Some(&alice())).await.unwrap();
    assert_eq!(listing.links.len(), 2);
    assert_eq!(listing.stats.total_links, 2);
    let ns = Namespace::for_email("alice@example.com");
    assert!(listing.links.iter().all(|l| l.namespace == ns.as_str()));
}
