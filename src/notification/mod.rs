//! 网络扩展本地通知
//!
//! # 设计目标
//! 1. 封闭的通知类型：所有内部逻辑只使用 `NotificationKind`
//! 2. 会话内去重：once-only 通知每个会话最多展示一次
//! 3. 系统解耦：展示交给实现 `NotificationSink` 的 sink
//! 4. 显式注入：分发器由宿主创建并以 `DispatcherHandle` 共享，不使用全局单例
//!
//! # 使用示例
//! ```ignore
//! use ne_notifier::notification::{DispatcherBuilder, MemorySink};
//!
//! let sink = Arc::new(MemorySink::new());
//! let dispatcher = DispatcherBuilder::new().sink(sink.clone()).build().into_handle();
//!
//! dispatcher.clear_only_once_tokens();
//! dispatcher.request_subscription_expired_notification();
//! ```

pub mod kind;
pub mod catalog;
pub mod dedup;
pub mod sink;
pub mod sinks;
pub mod dispatcher;
pub mod builder;

pub use kind::{
    DedupPolicy, NotificationKind, NOTIFICATION_ID_CORRUPT_SETTINGS,
    NOTIFICATION_ID_DISALLOWED_TRAFFIC, NOTIFICATION_ID_MUST_START_VPN_FROM_APP,
    NOTIFICATION_ID_OPEN_CONTAINER, NOTIFICATION_ID_PURCHASE_REQUIRED,
    NOTIFICATION_ID_REGION_UNAVAILABLE, NOTIFICATION_ID_SUBSCRIPTION_EXPIRED,
    NOTIFICATION_ID_UPSTREAM_PROXY_ERROR,
};
pub use catalog::{Catalog, NotificationCopy, NotificationDescriptor, Trigger, MESSAGE_PLACEHOLDER};
pub use dedup::OnceOnlyTokens;
pub use sink::{NotificationSink, SubmitResult};
pub use sinks::{MemorySink, SubmissionRecord, TracingSink, DEFAULT_LOG_LIMIT};
#[cfg(feature = "desktop")]
pub use sinks::DesktopSink;
pub use dispatcher::{DispatcherHandle, NotificationDispatcher};
pub use builder::{DispatcherBuilder, DispatcherConfig};
