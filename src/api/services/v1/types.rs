//! API v1 请求/响应类型

use serde::{Deserialize, Serialize};

use crate::storage::{LinkRecord, LinkStats};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SignupBody {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// POST /api/links 请求体；`shortCode` 兼容旧客户端
#[derive(Deserialize, Clone, Debug)]
pub struct ShortenBody {
    pub url: String,
    #[serde(default, alias = "shortCode")]
    pub code: Option<String>,
}

/// 对外展示的链接
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LinkView {
    pub id: String,
    pub original_url: String,
    pub code: String,
    pub short_url: String,
    /// 只在本用户命名空间内解析的地址，跨用户同码时仍然指向自己的链接
    pub scoped_url: String,
    pub visit_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl LinkView {
    pub fn from_record(link: LinkRecord, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            short_url: format!("{}/{}", base, link.code),
            scoped_url: format!("{}/{}/{}", base, link.owner_id, link.code),
            id: link.id,
            original_url: link.original_url,
            code: link.code,
            visit_count: link.visit_count,
            created_at: link.created_at.to_rfc3339(),
            updated_at: link.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LinksPayload {
    pub links: Vec<LinkView>,
    pub stats: LinkStats,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DeletePayload {
    pub deleted: LinkView,
    pub stats: LinkStats,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthDatabase {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthPayload {
    pub status: String,
    pub database: HealthDatabase,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_link_view_urls() {
        let now = Utc::now();
        let record = LinkRecord {
            id: "id-1".to_string(),
            owner_id: "u1".to_string(),
            namespace: "urls_a_b_c".to_string(),
            original_url: "https://example.com".to_string(),
            code: "abc123".to_string(),
            visit_count: 3,
            created_at: now,
            updated_at: now,
        };

        let view = LinkView::from_record(record, "https://s.io/");
        assert_eq!(view.short_url, "https://s.io/abc123");
        assert_eq!(view.scoped_url, "https://s.io/u1/abc123");
        assert_eq!(view.visit_count, 3);
    }

    #[test]
    fn test_shorten_body_accepts_legacy_field() {
        let body: ShortenBody =
            serde_json::from_str(r#"{"url":"example.com","shortCode":"mine"}"#).unwrap();
        assert_eq!(body.code.as_deref(), Some("mine"));

        let body: ShortenBody = serde_json::from_str(r#"{"url":"example.com"}"#).unwrap();
        assert!(body.code.is_none());
    }
}
