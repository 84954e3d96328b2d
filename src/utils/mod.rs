pub mod password;
pub mod url_validator;

/// 短码字母表（62 个字母数字）
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 生成 URL 安全的随机密钥（用于未配置 JWT secret 时）
pub fn generate_secure_token(length: usize) -> String {
    generate_random_code(length)
}

/// 短码字符集检查：`[A-Za-z0-9_-]`
#[inline]
pub fn is_code_charset(code: &str) -> bool {
    code.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// 跳转路径上的短码是否可能存在（不合法的直接 404，不查库）
#[inline]
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty() && code.len() <= 32 && is_code_charset(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code_length_and_charset() {
        for _ in 0..100 {
            let code = generate_random_code(6);
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_alphabet_has_62_symbols() {
        assert_eq!(CODE_ALPHABET.len(), 62);
    }

    #[test]
    fn test_is_valid_short_code() {
        assert!(is_valid_short_code("abc123"));
        assert!(is_valid_short_code("valid_code-1"));
        assert!(!is_valid_short_code(""));
        assert!(!is_valid_short_code("has space"));
        assert!(!is_valid_short_code("favicon.ico"));
        assert!(!is_valid_short_code(&"a".repeat(33)));
    }
}
