//! NE Notifier - VPN 网络扩展的本地通知分发

pub mod logging;
pub mod notification;

pub use logging::init_logging;
pub use notification::{
    Catalog, DedupPolicy, DispatcherBuilder, DispatcherConfig, DispatcherHandle, MemorySink,
    NotificationCopy, NotificationDescriptor, NotificationDispatcher, NotificationKind,
    NotificationSink, SubmitResult, TracingSink, Trigger,
};
pub use notification::kind::{
    NOTIFICATION_ID_CORRUPT_SETTINGS, NOTIFICATION_ID_DISALLOWED_TRAFFIC,
    NOTIFICATION_ID_MUST_START_VPN_FROM_APP, NOTIFICATION_ID_OPEN_CONTAINER,
    NOTIFICATION_ID_PURCHASE_REQUIRED, NOTIFICATION_ID_REGION_UNAVAILABLE,
    NOTIFICATION_ID_SUBSCRIPTION_EXPIRED, NOTIFICATION_ID_UPSTREAM_PROXY_ERROR,
};
#[cfg(feature = "desktop")]
pub use notification::DesktopSink;
