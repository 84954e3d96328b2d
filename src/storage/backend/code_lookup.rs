//! CodeLookup implementation for SeaOrmStorage

use async_trait::async_trait;

use super::SeaOrmStorage;
use crate::errors::Result;
use crate::services::CodeLookup;
use crate::storage::Namespace;

#[async_trait]
impl CodeLookup for SeaOrmStorage {
    async fn is_taken(&self, namespace: &Namespace, code: &str) -> Result<bool> {
        self.code_exists(namespace, code).await
    }
}
