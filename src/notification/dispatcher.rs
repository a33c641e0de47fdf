//! 通知分发器 - 去重后把通知交给系统 sink
//!
//! 每个请求：
//! 1. 查询 kind 的去重策略
//! 2. once-only 且本会话已展示 → 直接返回，不构建、不提交
//! 3. 从文案表构建 `NotificationDescriptor`
//! 4. once-only 的令牌在提交之前原子占用
//! 5. 提交给 sink，请求立即展示（同 identifier 由 sink 替换）
//!
//! 提交失败只记录日志，不重试，也不归还令牌。

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::catalog::{Catalog, NotificationDescriptor};
use super::dedup::OnceOnlyTokens;
use super::kind::NotificationKind;
use super::sink::{NotificationSink, SubmitResult};

/// 多个调用方共享同一个分发器
pub type DispatcherHandle = Arc<NotificationDispatcher>;

/// 单次请求的处理结果（仅用于日志和测试）
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DispatchOutcome {
    /// 本会话已展示过，被去重
    Suppressed,
    /// dry-run：令牌已占用，但没有提交
    DryRun,
    Submitted,
    Failed(String),
}

/// 通知分发器
///
/// 拥有去重状态；请通过 [`DispatcherHandle`] 注入给检测各类状况的逻辑，
/// 每个扩展进程只创建一个。
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
    catalog: Catalog,
    tokens: OnceOnlyTokens,
    dry_run: bool,
}

impl NotificationDispatcher {
    /// 使用默认文案创建分发器
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            sink,
            catalog: Catalog::new(),
            tokens: OnceOnlyTokens::new(),
            dry_run: false,
        }
    }

    /// 设置文案表
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 包装成共享句柄
    pub fn into_handle(self) -> DispatcherHandle {
        Arc::new(self)
    }

    pub fn request_open_container_to_connect_notification(&self) {
        self.request(NotificationKind::OpenContainer);
    }

    pub fn request_corrupt_settings_file_notification(&self) {
        self.request(NotificationKind::CorruptSettings);
    }

    pub fn request_subscription_expired_notification(&self) {
        self.request(NotificationKind::SubscriptionExpired);
    }

    pub fn request_selected_region_unavailable_notification(&self) {
        self.request(NotificationKind::RegionUnavailable);
    }

    /// `message` 是来自网络的诊断文本，原样放入正文
    pub fn request_upstream_proxy_error_notification(&self, message: &str) {
        self.dispatch(NotificationKind::UpstreamProxyError, Some(message));
    }

    pub fn request_disallowed_traffic_notification(&self) {
        self.request(NotificationKind::DisallowedTraffic);
    }

    pub fn request_cannot_start_without_active_subscription(&self) {
        self.request(NotificationKind::MustStartVpnFromApp);
    }

    pub fn request_purchase_required_prompt(&self) {
        self.request(NotificationKind::PurchaseRequired);
    }

    /// 按 kind 请求通知（`UpstreamProxyError` 使用空消息）
    pub fn request(&self, kind: NotificationKind) {
        self.dispatch(kind, None);
    }

    /// 按 kind 请求通知并附带消息（只有 `UpstreamProxyError` 使用消息）
    pub fn request_with_message(&self, kind: NotificationKind, message: &str) {
        self.dispatch(kind, Some(message));
    }

    /// 清空 once-only 令牌，新会话开始时调用
    pub fn clear_only_once_tokens(&self) {
        let cleared = self.tokens.clear();
        info!(cleared, "Cleared once-only notification tokens");
    }

    /// once-only kind 本会话是否已展示
    pub fn has_presented(&self, kind: NotificationKind) -> bool {
        self.tokens.contains(kind)
    }

    /// 本会话已展示的 once-only kind
    pub fn presented_once_only_kinds(&self) -> Vec<NotificationKind> {
        self.tokens.snapshot()
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub(crate) fn dispatch(&self, kind: NotificationKind, message: Option<&str>) -> DispatchOutcome {
        if !self.tokens.try_acquire(kind) {
            return DispatchOutcome::Suppressed;
        }

        if let Some(message) = message {
            debug!(kind = %kind, message = %message, "Notification message supplied");
        }
        let descriptor = self.catalog.descriptor(kind, message);

        if self.dry_run {
            info!(kind = %kind, identifier = descriptor.identifier, "[DRY-RUN] Would submit notification");
            return DispatchOutcome::DryRun;
        }

        self.submit(&descriptor)
    }

    fn submit(&self, descriptor: &NotificationDescriptor) -> DispatchOutcome {
        let sink = self.sink.name();

        match self.sink.submit(descriptor) {
            Ok(SubmitResult::Submitted) => {
                info!(
                    kind = %descriptor.kind,
                    identifier = descriptor.identifier,
                    sink = %sink,
                    "Notification submitted"
                );
                DispatchOutcome::Submitted
            }
            Ok(SubmitResult::Failed(reason)) => {
                warn!(
                    kind = %descriptor.kind,
                    sink = %sink,
                    error = %reason,
                    "Notification rejected by sink"
                );
                DispatchOutcome::Failed(reason)
            }
            Err(e) => {
                warn!(
                    kind = %descriptor.kind,
                    sink = %sink,
                    error = %e,
                    "Notification submit failed"
                );
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 测试用的 mock sink
    struct MockSink {
        submitted: Mutex<Vec<NotificationDescriptor>>,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn get_submit_count(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }

        fn last(&self) -> Option<NotificationDescriptor> {
            self.submitted.lock().unwrap().last().cloned()
        }
    }

    impl NotificationSink for MockSink {
        fn name(&self) -> &str {
            "mock"
        }

        fn submit(&self, descriptor: &NotificationDescriptor) -> Result<SubmitResult> {
            self.submitted.lock().unwrap().push(descriptor.clone());
            Ok(SubmitResult::Submitted)
        }
    }

    /// 总是失败的 sink
    struct FailingSink {
        attempts: AtomicUsize,
        hard_error: bool,
    }

    impl FailingSink {
        fn new(hard_error: bool) -> Self {
            Self {
                attempts: AtomicUsize::new(0),
                hard_error,
            }
        }
    }

    impl NotificationSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn submit(&self, _descriptor: &NotificationDescriptor) -> Result<SubmitResult> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.hard_error {
                Err(anyhow!("notification permission denied"))
            } else {
                Ok(SubmitResult::Failed("os error".to_string()))
            }
        }
    }

    #[test]
    fn test_once_only_dispatches_once() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        assert_eq!(
            dispatcher.dispatch(NotificationKind::OpenContainer, None),
            DispatchOutcome::Submitted
        );
        assert_eq!(
            dispatcher.dispatch(NotificationKind::OpenContainer, None),
            DispatchOutcome::Suppressed
        );
        assert_eq!(sink.get_submit_count(), 1);
        assert!(dispatcher.has_presented(NotificationKind::OpenContainer));
    }

    #[test]
    fn test_repeatable_dispatches_every_time() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        for _ in 0..4 {
            dispatcher.request_disallowed_traffic_notification();
        }
        assert_eq!(sink.get_submit_count(), 4);
        assert!(dispatcher.presented_once_only_kinds().is_empty());
    }

    #[test]
    fn test_named_operations_map_to_kinds() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        let cases: [(fn(&NotificationDispatcher), NotificationKind); 7] = [
            (
                NotificationDispatcher::request_open_container_to_connect_notification,
                NotificationKind::OpenContainer,
            ),
            (
                NotificationDispatcher::request_corrupt_settings_file_notification,
                NotificationKind::CorruptSettings,
            ),
            (
                NotificationDispatcher::request_subscription_expired_notification,
                NotificationKind::SubscriptionExpired,
            ),
            (
                NotificationDispatcher::request_selected_region_unavailable_notification,
                NotificationKind::RegionUnavailable,
            ),
            (
                NotificationDispatcher::request_disallowed_traffic_notification,
                NotificationKind::DisallowedTraffic,
            ),
            (
                NotificationDispatcher::request_cannot_start_without_active_subscription,
                NotificationKind::MustStartVpnFromApp,
            ),
            (
                NotificationDispatcher::request_purchase_required_prompt,
                NotificationKind::PurchaseRequired,
            ),
        ];

        for (request, kind) in cases {
            request(&dispatcher);
            let last = sink.last().unwrap();
            assert_eq!(last.kind, kind);
            assert_eq!(last.identifier, kind.as_identifier());
        }

        dispatcher.request_upstream_proxy_error_notification("boom");
        let last = sink.last().unwrap();
        assert_eq!(last.kind, NotificationKind::UpstreamProxyError);
        assert!(last.body.contains("boom"));
    }

    #[test]
    fn test_failed_submit_still_consumes_token() {
        for hard_error in [false, true] {
            let sink = Arc::new(FailingSink::new(hard_error));
            let dispatcher = NotificationDispatcher::new(sink.clone());

            let outcome = dispatcher.dispatch(NotificationKind::SubscriptionExpired, None);
            assert!(matches!(outcome, DispatchOutcome::Failed(_)));

            // 不重试、不归还令牌
            assert_eq!(
                dispatcher.dispatch(NotificationKind::SubscriptionExpired, None),
                DispatchOutcome::Suppressed
            );
            assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_failed_submit_error_message() {
        let dispatcher = NotificationDispatcher::new(Arc::new(FailingSink::new(true)));
        assert_eq!(
            dispatcher.dispatch(NotificationKind::DisallowedTraffic, None),
            DispatchOutcome::Failed("notification permission denied".to_string())
        );
    }

    #[test]
    fn test_dry_run_consumes_token_without_submitting() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = NotificationDispatcher::new(sink.clone()).with_dry_run(true);

        assert_eq!(
            dispatcher.dispatch(NotificationKind::PurchaseRequired, None),
            DispatchOutcome::DryRun
        );
        assert_eq!(
            dispatcher.dispatch(NotificationKind::PurchaseRequired, None),
            DispatchOutcome::Suppressed
        );
        assert_eq!(sink.get_submit_count(), 0); // 不应该实际提交
    }

    #[test]
    fn test_clear_only_once_tokens() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        dispatcher.request_subscription_expired_notification();
        dispatcher.request_subscription_expired_notification();
        dispatcher.clear_only_once_tokens();
        dispatcher.request_subscription_expired_notification();

        assert_eq!(sink.get_submit_count(), 2);
    }

    #[test]
    fn test_request_upstream_proxy_error_without_message() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        dispatcher.request(NotificationKind::UpstreamProxyError);
        let last = sink.last().unwrap();
        assert_eq!(
            last.body,
            "The VPN could not connect through your upstream proxy."
        );
    }

    #[test]
    fn test_request_with_message() {
        let sink = Arc::new(MockSink::new());
        let dispatcher = NotificationDispatcher::new(sink.clone());

        dispatcher.request_with_message(NotificationKind::UpstreamProxyError, "502 Bad Gateway");
        let last = sink.last().unwrap();
        assert_eq!(last.kind, NotificationKind::UpstreamProxyError);
        assert!(last.body.contains("502 Bad Gateway"));

        // 其他 kind 忽略消息，去重照常生效
        dispatcher.request_with_message(NotificationKind::OpenContainer, "ignored");
        dispatcher.request_with_message(NotificationKind::OpenContainer, "ignored");
        let last = sink.last().unwrap();
        assert_eq!(last.kind, NotificationKind::OpenContainer);
        assert!(!last.body.contains("ignored"));
        assert_eq!(sink.get_submit_count(), 2);
    }

    #[test]
    fn test_sink_name() {
        let dispatcher = NotificationDispatcher::new(Arc::new(MockSink::new()));
        assert_eq!(dispatcher.sink_name(), "mock");
        assert!(!dispatcher.is_dry_run());
    }
}
