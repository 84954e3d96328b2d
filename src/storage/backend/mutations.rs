//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, ExprTrait, QueryFilter, SqlErr,
    sea_query::Expr,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::{
    model_to_link, model_to_user, new_link_to_active_model, new_user_to_active_model,
};
use super::retry::{self, OperationKind};
use crate::errors::{Result, ShortspaceError};
use crate::storage::{LinkRecord, NewLink, NewUser, ResolvedLink, UserRecord};

use migration::entities::link;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl SeaOrmStorage {
    /// 插入用户；邮箱或命名空间冲突返回 EmailTaken
    pub async fn insert_user(&self, new_user: NewUser) -> Result<UserRecord> {
        let db = &self.db;
        let id = Uuid::new_v4().to_string();
        let active = new_user_to_active_model(&id, &new_user, Utc::now());

        let result = retry::with_retry_timeout(
            "insert_user",
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Write,
            || {
                let model = active.clone();
                async move { model.insert(db).await }
            },
        )
        .await;

        match result {
            Ok(model) => {
                info!("User created: {}", model.id);
                Ok(model_to_user(model))
            }
            Err(e) if is_unique_violation(&e) => Err(ShortspaceError::email_taken(format!(
                "邮箱已注册: {}",
                new_user.email
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// 插入链接；(namespace, code) 冲突返回 CodeConflict
    pub async fn insert_link(&self, new_link: NewLink) -> Result<LinkRecord> {
        let db = &self.db;
        let id = Uuid::new_v4().to_string();
        let active = new_link_to_active_model(&id, &new_link, Utc::now());

        let result = retry::with_retry_timeout(
            &format!("insert_link({})", new_link.code),
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Write,
            || {
                let model = active.clone();
                async move { model.insert(db).await }
            },
        )
        .await;

        match result {
            Ok(model) => {
                debug!("Link inserted: {} in {}", model.short_code, model.namespace);
                Ok(model_to_link(model))
            }
            Err(e) if is_unique_violation(&e) => Err(ShortspaceError::code_conflict(format!(
                "短码已被占用: {}",
                new_link.code
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// 删除属于 owner 的链接，返回被删除的记录；不存在或不属于该用户返回 None
    pub async fn delete_owned(&self, owner_id: &str, code: &str) -> Result<Option<LinkRecord>> {
        let Some(existing) = self.find_owned(owner_id, code).await? else {
            return Ok(None);
        };

        let db = &self.db;
        let id = existing.id.clone();
        let result = retry::with_retry_timeout(
            &format!("delete_owned({})", code),
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Write,
            || async {
                link::Entity::delete_many()
                    .filter(link::Column::Id.eq(id.as_str()))
                    .filter(link::Column::OwnerId.eq(owner_id))
                    .exec(db)
                    .await
            },
        )
        .await?;

        // 查到之后被并发删除
        if result.rows_affected == 0 {
            return Ok(None);
        }

        info!("Link deleted: {} (owner {})", code, owner_id);
        Ok(Some(existing))
    }

    /// 全局跳转：定位最早的同码链接并原子递增访问计数
    pub async fn record_visit(&self, code: &str) -> Result<Option<ResolvedLink>> {
        let Some(model) = self.find_oldest_by_code(code).await? else {
            return Ok(None);
        };
        self.increment_and_resolve(model).await
    }

    /// 限定用户的跳转：只在 owner 的命名空间里查找
    pub async fn record_scoped_visit(
        &self,
        owner_id: &str,
        code: &str,
    ) -> Result<Option<ResolvedLink>> {
        let db = &self.db;
        let model = retry::with_retry_timeout(
            &format!("find_scoped({})", code),
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

        match model {
            Some(model) => self.increment_and_resolve(model).await,
            None => Ok(None),
        }
    }

    async fn increment_and_resolve(&self, model: link::Model) -> Result<Option<ResolvedLink>> {
        let rows = self.increment_visit(&model.id).await?;
        if rows == 0 {
            // 定位之后被删除
            return Ok(None);
        }

        Ok(Some(ResolvedLink {
            id: model.id,
            owner_id: model.owner_id,
            code: model.short_code,
            original_url: model.original_url,
        }))
    }

    /// 单条 UPDATE：visit_count = visit_count + 1，同时刷新 updated_at
    ///
    /// 返回受影响行数，计数永远不在应用内读改写
    async fn increment_visit(&self, id: &str) -> Result<u64> {
        let db = &self.db;
        let result = retry::with_retry_timeout(
            "increment_visit",
            self.retry_config,
            self.operation_timeout_ms,
            OperationKind::Write,
            || async {
                link::Entity::update_many()
                    .col_expr(
                        link::Column::VisitCount,
                        Expr::col(link::Column::VisitCount).add(1i64),
                    )
                    .col_expr(link::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(link::Column::Id.eq(id))
                    .exec(db)
                    .await
            },
        )
        .await?;

        Ok(result.rows_affected)
    }
}
