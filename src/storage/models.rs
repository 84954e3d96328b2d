use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Namespace;

/// 已持久化的短链接
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkRecord {
    pub id: String,
    pub owner_id: String,
    pub namespace: String,
    pub original_url: String,
    pub code: String,
    pub visit_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 待插入的短链接，visit_count 固定从 0 开始
#[derive(Debug, Clone)]
pub struct NewLink {
    pub owner_id: String,
    pub namespace: Namespace,
    pub original_url: String,
    pub code: String,
}

/// 跳转命中的链接（计数已原子递增）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub id: String,
    pub owner_id: String,
    pub code: String,
    pub original_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub username: String,
    pub namespace: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// 单个命名空间的聚合统计
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkStats {
    pub total_links: u64,
    pub total_visits: u64,
    pub recent_links: u64,
}
