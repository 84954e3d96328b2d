//! Per-namespace statistics

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::errors::Result;
use crate::storage::{LinkStats, Namespace, SeaOrmStorage};

/// recent_links 统计窗口
pub const RECENT_WINDOW_HOURS: i64 = 24;

pub struct StatsAggregator {
    storage: Arc<SeaOrmStorage>,
}

impl StatsAggregator {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 命名空间当前的统计；空命名空间返回全 0
    pub async fn stats(&self, namespace: &Namespace) -> Result<LinkStats> {
        self.stats_at(namespace, Utc::now()).await
    }

    /// 以 `now` 为基准计算最近 24 小时窗口
    pub async fn stats_at(&self, namespace: &Namespace, now: DateTime<Utc>) -> Result<LinkStats> {
        let since = now - Duration::hours(RECENT_WINDOW_HOURS);
        self.storage.stats(namespace, since).await
    }
}
