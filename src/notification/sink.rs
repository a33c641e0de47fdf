//! 通知 sink trait 定义 - 对接宿主操作系统的通知子系统

use anyhow::Result;

use super::catalog::NotificationDescriptor;

/// 提交结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    /// 已交给系统展示
    Submitted,
    /// 系统拒绝（无权限、系统错误等）
    Failed(String),
}

/// 系统通知 sink
///
/// 同一 `identifier` 再次提交时，sink 负责替换尚未展示/仍在挂起的通知，
/// 而不是叠加一条新的。提交是 fire-and-forget 的，不应阻塞调用方。
pub trait NotificationSink: Send + Sync {
    /// sink 名称（用于日志）
    fn name(&self) -> &str;

    /// 提交通知，请求立即展示
    fn submit(&self, descriptor: &NotificationDescriptor) -> Result<SubmitResult>;
}
