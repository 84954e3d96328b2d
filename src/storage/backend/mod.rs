//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod code_lookup;
mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use std::time::Duration;

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::errors::{Result, ShortspaceError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_link, model_to_user};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(ShortspaceError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 重试配置
    retry_config: retry::RetryConfig,
    /// 单次数据库调用的超时
    operation_timeout_ms: u64,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(ShortspaceError::database_config(
                "DATABASE_URL 未设置".to_string(),
            ));
        }

        let config = crate::config::get_config();
        let retry_config = retry::RetryConfig {
            max_retries: config.database.retry_count,
            base_delay_ms: config.database.retry_base_delay_ms,
            max_delay_ms: config.database.retry_max_delay_ms,
        };

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
            operation_timeout_ms: config.database.operation_timeout_ms.max(1),
        };

        run_migrations(&storage.db).await?;

        info!(
            "{} storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接（迁移、健康检查等需要直接访问数据库的场景）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 健康检查：在超时时间内 ping 一次数据库
    pub async fn ping(&self) -> Result<()> {
        let timeout = Duration::from_millis(self.operation_timeout_ms);
        match tokio::time::timeout(timeout, self.db.ping()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ShortspaceError::store_unavailable(format!(
                "数据库不可用: {}",
                e
            ))),
            Err(_) => Err(ShortspaceError::store_unavailable(format!(
                "数据库 ping 超时 ({}ms)",
                self.operation_timeout_ms
            ))),
        }
    }

    /// 关闭连接池
    pub async fn close(&self) -> Result<()> {
        if let Err(e) = self.db.clone().close().await {
            warn!("关闭数据库连接失败: {}", e);
            return Err(e.into());
        }
        info!("{} storage closed", self.backend_name.to_uppercase());
        Ok(())
    }
}
