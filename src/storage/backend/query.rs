//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, EntityTrait, ExprTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};
use tracing::debug;

use super::converters::{model_to_link, model_to_user};
use super::retry::{self, OperationKind};
use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::{LinkRecord, LinkStats, Namespace, UserRecord};

use migration::entities::{link, user};

/// 统计查询结果（DSL 聚合查询）
#[derive(Debug, FromQueryResult)]
struct StatsRow {
    total_links: i64,
    total_visits: Option<i64>,
    recent_links: Option<i64>,
}

impl SeaOrmStorage {
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let db = &self.db;
        let model = retry::with_retry_timeout(
            "find_user_by_email",
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Read,
            || async {
                user::Entity::find()
                    .filter(user::Column::Email.eq(email))
                    .one(db)
                    .await
            },
        )
        .await?;

        Ok(model.map(model_to_user))
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let db = &self.db;
        let model = retry::with_retry_timeout(
            "find_user_by_id",
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Read,
            || async { user::Entity::find_by_id(id).one(db).await },
        )
        .await?;

        Ok(model.map(model_to_user))
    }

    /// 命名空间内是否已存在该短码
    pub async fn code_exists(&self, namespace: &Namespace, code: &str) -> Result<bool> {
        let db = &self.db;
        let count = retry::with_retry_timeout(
            &format!("code_exists({})", code),
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Read,
            || async {
                link::Entity::find()
                    .filter(link::Column::Namespace.eq(namespace.as_str()))
                    .filter(link::Column::ShortCode.eq(code))
                    .count(db)
                    .await
            },
        )
        .await?;

        Ok(count > 0)
    }

    /// 同一用户对同一地址已生成过的短链接（多条时取最早的）
    pub async fn find_by_owner_url(
        &self,
        owner_id: &str,
        original_url: &str,
    ) -> Result<Option<LinkRecord>> {
        let db = &self.db;
        let model = retry::with_retry_timeout(
            "find_by_owner_url",
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Read,
            || async {
                link::Entity::find()
                    .filter(link::Column::OwnerId.eq(owner_id))
                    .filter(link::Column::OriginalUrl.eq(original_url))
                    .order_by_asc(link::Column::CreatedAt)
                    .order_by_asc(link::Column::Id)
                    .one(db)
                    .await
            },
        )
        .await?;

        Ok(model.map(model_to_link))
    }

    /// 按 (owner_id, code) 查找，别人的链接一律视为不存在
    pub async fn find_owned(&self, owner_id: &str, code: &str) -> Result<Option<LinkRecord>> {
        let db = &self.db;
        let model = retry::with_retry_timeout(
            &format!("find_owned({})", code),
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Read,
            || async {
                link::Entity::find()
                    .filter(link::Column::OwnerId.eq(owner_id))
                    .filter(link::Column::ShortCode.eq(code))
                    .one(db)
                    .await
            },
        )
        .await?;

        Ok(model.map(model_to_link))
    }

    /// 全局按短码查找；多个命名空间同码时取最早创建的
    pub(super) async fn find_oldest_by_code(&self, code: &str) -> Result<Option<link::Model>> {
        let db = &self.db;
        let model = retry::with_retry_timeout(
            &format!("find_oldest_by_code({})", code),
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Read,
            || async {
                link::Entity::find()
                    .filter(link::Column::ShortCode.eq(code))
                    .order_by_asc(link::Column::CreatedAt)
                    .order_by_asc(link::Column::Id)
                    .one(db)
                    .await
            },
        )
        .await?;

        Ok(model)
    }

    /// 命名空间内全部链接，新的在前
    pub async fn list_links(&self, namespace: &Namespace) -> Result<Vec<LinkRecord>> {
        let db = &self.db;
        let models = retry::with_retry_timeout(
            "list_links",
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Read,
            || async {
                link::Entity::find()
                    .filter(link::Column::Namespace.eq(namespace.as_str()))
                    .order_by_desc(link::Column::CreatedAt)
                    .order_by_desc(link::Column::Id)
                    .all(db)
                    .await
            },
        )
        .await?;

        debug!("Loaded {} links from {}", models.len(), namespace);
        Ok(models.into_iter().map(model_to_link).collect())
    }

    /// 命名空间聚合统计，`since` 之后创建的计入 recent_links
    pub async fn stats(&self, namespace: &Namespace, since: DateTime<Utc>) -> Result<LinkStats> {
        let db = &self.db;
        let row = retry::with_retry_timeout(
            "stats",
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Read,
            || async {
                link::Entity::find()
                    .select_only()
                    // COUNT(id)
                    .column_as(link::Column::Id.count(), "total_links")
                    // SUM(visit_count)
                    .column_as(link::Column::VisitCount.sum(), "total_visits")
                    // SUM(CASE WHEN created_at > since THEN 1 ELSE 0 END)
                    .column_as(
                        Expr::case(link::Column::CreatedAt.gt(since), 1)
                            .finally(0)
                            .sum(),
                        "recent_links",
                    )
                    .filter(link::Column::Namespace.eq(namespace.as_str()))
                    .into_model::<StatsRow>()
                    .one(db)
                    .await
            },
        )
        .await?;

        Ok(row
            .map(|r| LinkStats {
                total_links: Ord::max(r.total_links, 0) as u64,
                total_visits: Ord::max(r.total_visits.unwrap_or(0), 0) as u64,
                recent_links: Ord::max(r.recent_links.unwrap_or(0), 0) as u64,
            })
            .unwrap_or_default())
    }
}
