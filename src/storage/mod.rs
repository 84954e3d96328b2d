//! 持久化层
//!
//! 链接按命名空间分区存储，(namespace, code) 唯一；访问计数只通过单条
//! UPDATE 原子递增

use std::sync::Arc;

use crate::errors::Result;

pub mod backend;
pub mod models;
pub mod namespace;

pub use backend::SeaOrmStorage;
pub use models::{LinkRecord, LinkStats, NewLink, NewUser, ResolvedLink, UserRecord};
pub use namespace::Namespace;

pub struct StorageFactory;

impl StorageFactory {
    /// 按配置中的 database_url 创建存储并执行迁移
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = backend::SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
