//! 用户命名空间
//!
//! 每个用户的链接都落在 `urls_<email>` 分区里，邮箱中非字母数字字符替换为 `_`

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub const PREFIX: &'static str = "urls_";

    /// 由邮箱推导命名空间（大小写不敏感）
    pub fn for_email(email: &str) -> Self {
        let sanitized: String = email
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        Namespace(format!("{}{}", Self::PREFIX, sanitized))
    }

    /// 包装已存储的命名空间字符串
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Namespace(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
