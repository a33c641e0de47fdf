//! 分发器构建器 - 组装 sink、文案覆盖和 dry-run 配置

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::catalog::{Catalog, NotificationCopy};
use super::dispatcher::NotificationDispatcher;
use super::kind::NotificationKind;
use super::sink::NotificationSink;
use super::sinks::TracingSink;

/// 宿主提供的分发器配置
///
/// ```json
/// {
///   "dry_run": false,
///   "copy_overrides": {
///     "purchase-required": { "title": "...", "body": "..." }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// 只更新去重状态，不提交给 sink
    pub dry_run: bool,
    /// 按 kind 覆盖文案（如本地化字符串）
    pub copy_overrides: HashMap<NotificationKind, NotificationCopy>,
}

impl DispatcherConfig {
    /// 解析宿主传入的 JSON 配置
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid notification dispatcher config")
    }
}

/// 分发器构建器
pub struct DispatcherBuilder {
    sink: Option<Arc<dyn NotificationSink>>,
    config: DispatcherConfig,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            sink: None,
            config: DispatcherConfig::default(),
        }
    }

    /// 设置系统通知 sink
    pub fn sink<S: NotificationSink + 'static>(mut self, sink: Arc<S>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 使用整份配置（覆盖之前的 dry-run 和文案设置）
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置 dry-run 模式
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// 覆盖某个 kind 的文案
    pub fn copy_override(mut self, kind: NotificationKind, copy: NotificationCopy) -> Self {
        self.config.copy_overrides.insert(kind, copy);
        self
    }

    /// 构建 NotificationDispatcher（未指定 sink 时写日志）
    pub fn build(self) -> NotificationDispatcher {
        let sink: Arc<dyn NotificationSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(TracingSink::new()),
        };

        info!(
            sink = sink.name(),
            dry_run = self.config.dry_run,
            overrides = self.config.copy_overrides.len(),
            "Building notification dispatcher"
        );

        let catalog = Catalog::new().with_overrides(self.config.copy_overrides);
        NotificationDispatcher::new(sink)
            .with_catalog(catalog)
            .with_dry_run(self.config.dry_run)
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
