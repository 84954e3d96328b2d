//! URL 规范化与验证
//!
//! 用户提交的地址先规范化（去空白、补 https://），再检查协议和格式

use url::Url;

/// URL 验证错误
#[derive(Debug)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
    MissingHost,
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
            Self::MissingHost => write!(f, "URL must contain a host"),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 危险协议列表
const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 输入是否已经带了协议前缀（`ftp://`、`mailto:` 等）
///
/// `host:port` 形式不算：冒号后面紧跟数字时视为端口。
fn has_scheme(input: &str) -> bool {
    let Some((scheme, rest)) = input.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return false;
    }

    rest.starts_with("//") || !rest.starts_with(|c: char| c.is_ascii_digit())
}

/// 规范化用户输入的 URL
///
/// 去掉首尾空白；没有任何协议前缀时补上 https://。
/// 已经带了其他协议的输入原样返回，交给 [`validate_url`] 拒绝。
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// 验证 URL 安全性
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 不是危险协议（javascript:, data:, file: 等）
/// 3. 必须是 http:// 或 https://
/// 4. URL 格式有效且包含主机名
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();

    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// 规范化后验证，返回最终存储的 URL
pub fn normalize_and_validate(raw: &str) -> Result<String, UrlValidationError> {
    let normalized = normalize_url(raw);
    validate_url(&normalized)?;
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prepends_https() {
        assert_eq!(normalize_url("example.com/a"), "https://example.com/a");
        assert_eq!(normalize_url("  example.com  "), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("HTTPS://Example.com"), "HTTPS://Example.com");
        assert_eq!(normalize_url("   "), "");
        assert_eq!(normalize_url("localhost:8080/x"), "https://localhost:8080/x");
    }

    #[test]
    fn test_normalize_keeps_foreign_scheme() {
        assert_eq!(normalize_url("ftp://example.com"), "ftp://example.com");
        assert_eq!(normalize_url(" mailto:a@b.com "), "mailto:a@b.com");
        assert_eq!(normalize_url("ws://h.io/x"), "ws://h.io/x");
    }

    #[test]
    fn test_normalize_and_validate_rejects_foreign_scheme() {
        for input in ["ftp://example.com", "mailto:a@b.com", "ws://h.io/x"] {
            assert!(
                matches!(
                    normalize_and_validate(input),
                    Err(UrlValidationError::InvalidProtocol(_))
                ),
                "{input} should be rejected"
            );
        }
        assert!(matches!(
            normalize_and_validate("javascript:alert(1)"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
    }

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/path?query=1").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn test_dangerous_protocols() {
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
        assert!(matches!(
            validate_url("file:///etc/passwd"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
    }

    #[test]
    fn test_invalid_protocols() {
        assert!(matches!(
            validate_url("ftp://example.com"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
    }

    #[test]
    fn test_normalize_and_validate() {
        assert_eq!(
            normalize_and_validate("example.com/a").unwrap(),
            "https://example.com/a"
        );
        // 补上 https:// 之后仍然不是合法地址
        assert!(normalize_and_validate("exa mple.com").is_err());
        assert!(normalize_and_validate("").is_err());
        assert!(normalize_and_validate("https://").is_err());
        assert!(normalize_and_validate("javascript:alert(1)").is_err());
    }
}
