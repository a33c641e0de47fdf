//! 一次性通知令牌 - 每个会话内 once-only 通知最多展示一次
//!
//! ## 去重策略
//! 1. 只有 `DedupPolicy::OnceOnly` 的 kind 会占用令牌
//! 2. 检查与插入在同一个锁内完成，并发请求不会重复展示
//! 3. `clear()` 清空全部令牌，新会话开始时调用
//! 4. 提交失败不归还令牌（至多一次，而非保证送达）

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::kind::NotificationKind;

/// 已展示过的 once-only kind 集合
#[derive(Debug, Default)]
pub struct OnceOnlyTokens {
    presented: Mutex<BTreeSet<NotificationKind>>,
}

impl OnceOnlyTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试占用 `kind` 的令牌
    ///
    /// 返回 `true` 表示应该展示，`false` 表示本会话已展示过。
    /// 可重复展示的 kind 总是返回 `true`，且不记录。
    pub fn try_acquire(&self, kind: NotificationKind) -> bool {
        if !kind.is_once_only() {
            return true;
        }

        let acquired = self.lock().insert(kind);
        if !acquired {
            debug!(kind = %kind, "Once-only notification already presented this session");
        }
        acquired
    }

    /// 清空所有令牌
    pub fn clear(&self) -> usize {
        let mut presented = self.lock();
        let cleared = presented.len();
        presented.clear();
        cleared
    }

    pub fn contains(&self, kind: NotificationKind) -> bool {
        self.lock().contains(&kind)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// 当前已占用令牌的 kind（按枚举顺序）
    pub fn snapshot(&self) -> Vec<NotificationKind> {
        self.lock().iter().copied().collect()
    }

    // 集合本身不会处于不一致状态，锁中毒时直接恢复
    fn lock(&self) -> MutexGuard<'_, BTreeSet<NotificationKind>> {
        self.presented
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    #[test]
    fn test_once_only_acquired_once() {
        let tokens = OnceOnlyTokens::new();
        let kind = NotificationKind::SubscriptionExpired;

        // 第一次应该展示
        assert!(tokens.try_acquire(kind));
        // 之后被去重
        assert!(!tokens.try_acquire(kind));
        assert!(!tokens.try_acquire(kind));
        assert!(tokens.contains(kind));
    }

    #[test]
    fn test_repeatable_never_recorded() {
        let tokens = OnceOnlyTokens::new();

        for _ in 0..3 {
            assert!(tokens.try_acquire(NotificationKind::DisallowedTraffic));
            assert!(tokens.try_acquire(NotificationKind::UpstreamProxyError));
        }
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_kinds_are_independent() {
        let tokens = OnceOnlyTokens::new();

        assert!(tokens.try_acquire(NotificationKind::OpenContainer));
        assert!(tokens.try_acquire(NotificationKind::PurchaseRequired));
        assert!(!tokens.try_acquire(NotificationKind::OpenContainer));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_clear_allows_again() {
        let tokens = OnceOnlyTokens::new();
        let kind = NotificationKind::RegionUnavailable;

        assert!(tokens.try_acquire(kind));
        assert_eq!(tokens.clear(), 1);
        assert!(tokens.is_empty());
        assert!(tokens.try_acquire(kind));
    }

    #[test]
    fn test_clear_on_empty_is_noop() {
        let tokens = OnceOnlyTokens::new();
        assert_eq!(tokens.clear(), 0);
        assert_eq!(tokens.clear(), 0);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let tokens = OnceOnlyTokens::new();
        tokens.try_acquire(NotificationKind::PurchaseRequired);
        tokens.try_acquire(NotificationKind::OpenContainer);

        assert_eq!(
            tokens.snapshot(),
            vec![NotificationKind::OpenContainer, NotificationKind::PurchaseRequired]
        );
    }

    #[test]
    fn test_concurrent_acquire_only_one_wins() {
        let tokens = OnceOnlyTokens::new();
        let winners = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    barrier.wait();
                    if tokens.try_acquire(NotificationKind::MustStartVpnFromApp) {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}
