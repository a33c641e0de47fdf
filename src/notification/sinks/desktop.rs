//! 桌面通知 sink（notify-rust）
//!
//! XDG 平台上记录每个 identifier 最近一次的通知 id，再次提交时复用该 id，
//! 由通知服务器替换原通知。查找、展示、记录 id 在同一个锁内完成，
//! 同一 identifier 的并发提交不会叠加。
//!
//! 其他平台（macOS / Windows）notify-rust 不支持按 id 替换：每次提交都会
//! 展示一条新通知，同 identifier 的替换约定在这些平台上不成立。

use anyhow::Result;
use notify_rust::{Notification, Timeout};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::notification::catalog::NotificationDescriptor;
use crate::notification::sink::{NotificationSink, SubmitResult};

/// 桌面通知 sink
pub struct DesktopSink {
    app_name: String,
    /// identifier -> 系统通知 id（仅 XDG 平台写入）
    handles: Mutex<HashMap<&'static str, u32>>,
}

impl DesktopSink {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            handles: Mutex::new(HashMap::new()),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// 当前平台是否支持按 identifier 替换
    pub fn supports_replacement() -> bool {
        cfg!(all(unix, not(target_os = "macos")))
    }

    /// identifier 对应的系统通知 id
    pub fn notification_id(&self, identifier: &str) -> Option<u32> {
        self.handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(identifier)
            .copied()
    }

    fn build(&self, descriptor: &NotificationDescriptor) -> Notification {
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(&descriptor.title)
            .body(&descriptor.body)
            .timeout(Timeout::Default);
        notification
    }
}

impl NotificationSink for DesktopSink {
    fn name(&self) -> &str {
        "desktop"
    }

    fn submit(&self, descriptor: &NotificationDescriptor) -> Result<SubmitResult> {
        #[allow(unused_mut)]
        let mut notification = self.build(descriptor);

        // 整个提交过程持有锁
        #[allow(unused_mut, unused_variables)]
        let mut handles = self
            .handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            if let Some(id) = handles.get(descriptor.identifier) {
                notification.id(*id);
            }
        }

        match notification.show() {
            Ok(_handle) => {
                #[cfg(all(unix, not(target_os = "macos")))]
                {
                    handles.insert(descriptor.identifier, _handle.id());
                }

                debug!(sink = "desktop", identifier = descriptor.identifier, "Notification shown");
                Ok(SubmitResult::Submitted)
            }
            Err(e) => {
                warn!(sink = "desktop", error = %e, "Failed to show notification");
                Ok(SubmitResult::Failed(e.to_string()))
            }
        }
    }
}
