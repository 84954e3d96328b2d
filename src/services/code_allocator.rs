//! Short code allocation
//!
//! Generated codes are 6 characters drawn from the 62-symbol alphabet and are
//! retried a bounded number of times on collision. Custom codes are validated
//! and checked once; a taken custom code is a conflict, never a retry.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::{Result, ShortspaceError};
use crate::storage::Namespace;
use crate::utils::{generate_random_code, is_code_charset};

/// 自动生成短码的长度
pub const GENERATED_CODE_LENGTH: usize = 6;
/// 自动生成的最大尝试次数
pub const MAX_ALLOCATION_ATTEMPTS: usize = 10;
pub const CUSTOM_CODE_MIN_LEN: usize = 3;
pub const CUSTOM_CODE_MAX_LEN: usize = 20;

/// 命名空间内短码占用查询
#[async_trait]
pub trait CodeLookup: Send + Sync {
    async fn is_taken(&self, namespace: &Namespace, code: &str) -> Result<bool>;
}

/// 候选短码来源
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(GENERATED_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_random_code(self.length)
    }
}

/// 自定义短码格式检查：`[A-Za-z0-9_-]{3,20}`
pub fn validate_custom_code(code: &str) -> Result<()> {
    let len = code.len();
    if !(CUSTOM_CODE_MIN_LEN..=CUSTOM_CODE_MAX_LEN).contains(&len) || !is_code_charset(code) {
        return Err(ShortspaceError::invalid_code(format!(
            "Invalid short code '{}'. Use {}-{} letters, digits, '_' or '-'.",
            code, CUSTOM_CODE_MIN_LEN, CUSTOM_CODE_MAX_LEN
        )));
    }
    Ok(())
}

pub struct CodeAllocator {
    lookup: Arc<dyn CodeLookup>,
    generator: Arc<dyn CodeGenerator>,
    max_attempts: usize,
}

impl CodeAllocator {
    pub fn new(lookup: Arc<dyn CodeLookup>) -> Self {
        Self::with_generator(lookup, Arc::new(RandomCodeGenerator::default()))
    }

    pub fn with_generator(lookup: Arc<dyn CodeLookup>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self {
            lookup,
            generator,
            max_attempts: MAX_ALLOCATION_ATTEMPTS,
        }
    }

    /// 返回命名空间内当前可用的短码（不落库）
    pub async fn allocate(&self, namespace: &Namespace, custom: Option<&str>) -> Result<String> {
        match custom {
            Some(code) => self.claim_custom(namespace, code).await,
            None => {
                self.insert_generated(namespace, |code| async move { Ok(code) })
                    .await
            }
        }
    }

    /// 校验自定义短码并确认未被占用
    pub async fn claim_custom(&self, namespace: &Namespace, code: &str) -> Result<String> {
        validate_custom_code(code)?;

        if self.lookup.is_taken(namespace, code).await? {
            return Err(ShortspaceError::code_conflict(format!(
                "Short code '{}' is already in use",
                code
            )));
        }
        Ok(code.to_string())
    }

    /// 生成短码并交给 `insert` 落库
    ///
    /// 预检查命中或插入时撞上唯一约束都消耗一次尝试，
    /// 全部用完返回 AllocationExhausted
    pub async fn insert_generated<T, F, Fut>(&self, namespace: &Namespace, mut insert: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();

            if self.lookup.is_taken(namespace, &candidate).await? {
                debug!(
                    "Generated code '{}' taken in {} (attempt {}/{})",
                    candidate, namespace, attempt, self.max_attempts
                );
                continue;
            }

            match insert(candidate).await {
                Ok(value) => return Ok(value),
                Err(ShortspaceError::CodeConflict(msg)) => {
                    // 预检查之后被并发占用
                    warn!(
                        "Generated code raced in {} (attempt {}/{}): {}",
                        namespace, attempt, self.max_attempts, msg
                    );
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            "Code allocation exhausted after {} attempts in {}",
            self.max_attempts, namespace
        );
        Err(ShortspaceError::allocation_exhausted(format!(
            "Could not allocate a unique short code after {} attempts",
            self.max_attempts
        )))
    }
}
