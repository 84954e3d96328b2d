use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::jwt::JwtService;
use crate::services::{LinkService, RedirectResolver, UserService};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 服务启动需要的共享组件
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub jwt: Arc<JwtService>,
    pub link_service: Arc<LinkService>,
    pub user_service: Arc<UserService>,
    pub resolver: Arc<RedirectResolver>,
}

impl StartupContext {
    /// 在已有存储之上组装服务
    pub fn from_parts(storage: Arc<SeaOrmStorage>, jwt: Arc<JwtService>) -> Self {
        Self {
            link_service: Arc::new(LinkService::from_storage(storage.clone())),
            user_service: Arc::new(UserService::new(storage.clone(), jwt.clone())),
            resolver: Arc::new(RedirectResolver::new(storage.clone())),
            storage,
            jwt,
        }
    }
}

/// 准备服务器启动的上下文
///
/// 连接数据库、执行迁移，然后创建各个服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let jwt = Arc::new(JwtService::from_config());
    let context = StartupContext::from_parts(storage, jwt);

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}
