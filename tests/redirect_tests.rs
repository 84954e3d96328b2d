//! RedirectResolver tests
//!
//! 全局/限定用户跳转、并发计数和未知短码

use std::sync::{Arc, Once};

use shortspace::config::init_config;
use shortspace::errors::ShortspaceError;
use shortspace::services::{CreateLinkRequest, Identity, LinkService, RedirectResolver};
use shortspace::storage::backend::SeaOrmStorage;
use tempfile::TempDir;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_storage() -> (TempDir, Arc<SeaOrmStorage>) {
    init_test_config();
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_path = temp_dir.path().join("redirect.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("创建存储失败");
    (temp_dir, Arc::new(storage))
}

async fn create_link(
    service: &LinkService,
    identity: &Identity,
    url: &str,
    code: &str,
) -> shortspace::storage::LinkRecord {
    service
        .create_link(Some(identity), CreateLinkRequest::new(url).with_code(code))
        .await
        .expect("创建链接失败")
        .link
}

#[tokio::test]
async fn test_resolve_increments_visit_count() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage.clone());
    let resolver = RedirectResolver::new(storage.clone());
    let owner = Identity::new("u1", "alice@example.com");

    let created = create_link(&service, &owner, "example.com/r", "hello").await;

    let resolved = resolver.resolve("hello").await.unwrap();
    assert_eq!(resolved.original_url, "https://example.com/r");
    assert_eq!(resolved.owner_id, "u1");

    let link = storage.find_owned("u1", "hello").await.unwrap().unwrap();
    assert_eq!(link.visit_count, 1);
    assert_eq!(link.id, created.id);
    assert!(link.updated_at >= link.created_at);
}

#[tokio::test]
async fn test_concurrent_resolves_lose_no_updates() {
    const N: usize = 50;

    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage.clone());
    let resolver = Arc::new(RedirectResolver::new(storage.clone()));
    let owner = Identity::new("u1", "alice@example.com");

    create_link(&service, &owner, "example.com/hot", "hotlink").await;

    let mut handles = Vec::with_capacity(N);
    for _ in 0..N {
        let resolver = resolver.clone();
        handles.push(tokio::spawn(async move { resolver.resolve("hotlink").await }));
    }
    for handle in handles {
        handle.await.expect("任务 panic").expect("跳转失败");
    }

    let link = storage.find_owned("u1", "hotlink").await.unwrap().unwrap();
    assert_eq!(link.visit_count, N as u64);
}

#[tokio::test]
async fn test_unknown_code_is_not_found_without_mutation() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage.clone());
    let resolver = RedirectResolver::new(storage.clone());
    let owner = Identity::new("u1", "alice@example.com");

    let existing = create_link(&service, &owner, "example.com/e", "exists").await;

    for code in ["missing", "", "bad code", "favicon.ico"] {
        let err = resolver.resolve(code).await.unwrap_err();
        assert!(matches!(err, ShortspaceError::NotFound(_)), "{code:?}");
        assert!(!err.is_transient());
    }

    let links = storage.list_links(&owner.namespace()).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].id, existing.id);
    assert_eq!(links[0].visit_count, 0);
}

#[tokio::test]
async fn test_global_resolve_prefers_oldest_record() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage.clone());
    let resolver = RedirectResolver::new(storage.clone());
    let alice = Identity::new("u1", "alice@example.com");
    let bob = Identity::new("u2", "bob@example.com");

    create_link(&service, &alice, "example.com/alice", "promo").await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    create_link(&service, &bob, "example.com/bob", "promo").await;

    for _ in 0..3 {
        let resolved = resolver.resolve("promo").await.unwrap();
        assert_eq!(resolved.owner_id, "u1");
    }

    let bob_link = storage.find_owned("u2", "promo").await.unwrap().unwrap();
    assert_eq!(bob_link.visit_count, 0);
}

#[tokio::test]
async fn test_scoped_resolve_uses_owner_namespace() {
    let (_dir, storage) = create_storage().await;
    let service = LinkService::from_storage(storage.clone());
    let resolver = RedirectResolver::new(storage.clone());
    let alice = Identity::new("u1", "alice@example.com");
    let bob = Identity::new("u2", "bob@example.com");

    create_link(&service, &alice, "example.com/alice", "promo").await;
    create_link(&service, &bob, "example.com/bob", "promo").await;

    let resolved = resolver.resolve_scoped("u2", "promo").await.unwrap();
    assert_eq!(resolved.original_url, "https://example.com/bob");

    let bob_link = storage.find_owned("u2", "promo").await.unwrap().unwrap();
    assert_eq!(bob_link.visit_count, 1);
    let alice_link = storage.find_owned("u1", "promo").await.unwrap().unwrap();
    assert_eq!(alice_link.visit_count, 0);

    assert!(matches!(
        resolver.resolve_scoped("u3", "promo").await,
        Err(ShortspaceError::NotFound(_))
    ));
}
