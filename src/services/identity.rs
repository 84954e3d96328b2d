//! Authenticated caller identity

use serde::{Deserialize, Serialize};

use crate::storage::Namespace;

/// 已验证的调用者，由 bearer token 解出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
        }
    }

    /// 调用者的链接分区
    pub fn namespace(&self) -> Namespace {
        Namespace::for_email(&self.email)
    }
}
