//! 日志 sink - 没有系统通知能力时，把通知写进 tracing 日志

use anyhow::Result;
use tracing::info;

use crate::notification::catalog::NotificationDescriptor;
use crate::notification::sink::{NotificationSink, SubmitResult};

/// 日志 sink
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingSink {
    fn name(&self) -> &str {
        "tracing"
    }

    fn submit(&self, descriptor: &NotificationDescriptor) -> Result<SubmitResult> {
        info!(
            sink = "tracing",
            identifier = descriptor.identifier,
            title = %descriptor.title,
            body = %descriptor.body,
            "Notification presented"
        );
        Ok(SubmitResult::Submitted)
    }
}
