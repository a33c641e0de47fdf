//! 内存 sink - 记录所有提交，并按 identifier 维护挂起通知

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::notification::catalog::NotificationDescriptor;
use crate::notification::sink::{NotificationSink, SubmitResult};

/// 一次提交记录
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionRecord {
    /// 提交时间
    pub ts: DateTime<Utc>,
    pub descriptor: NotificationDescriptor,
}

/// 默认保留的提交记录条数
pub const DEFAULT_LOG_LIMIT: usize = 200;

#[derive(Debug, Default)]
struct MemorySinkState {
    /// 最近的提交记录，超出上限时丢弃最旧的
    submissions: VecDeque<SubmissionRecord>,
    /// 累计提交次数（不受上限影响）
    total: usize,
    /// 挂起通知，每个 identifier 最多一条
    pending: Vec<NotificationDescriptor>,
}

/// 内存 sink
///
/// 宿主可以轮询 [`MemorySink::pending`] 自行展示，测试用它检查提交记录。
/// 提交记录最多保留 `log_limit` 条；挂起通知每个 identifier 最多一条，
/// 长时间运行也不会无限增长。
#[derive(Debug)]
pub struct MemorySink {
    state: Mutex<MemorySinkState>,
    log_limit: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemorySinkState::default()),
            log_limit: DEFAULT_LOG_LIMIT,
        }
    }

    /// 设置提交记录上限（0 表示不保留记录，只维护挂起通知）
    pub fn with_log_limit(mut self, limit: usize) -> Self {
        self.log_limit = limit;
        self
    }

    pub fn log_limit(&self) -> usize {
        self.log_limit
    }

    /// 保留的提交记录（按提交顺序）
    pub fn submissions(&self) -> Vec<SubmissionRecord> {
        self.lock().submissions.iter().cloned().collect()
    }

    /// 保留的提交记录条数
    pub fn submission_count(&self) -> usize {
        self.lock().submissions.len()
    }

    /// 累计提交次数（包括已被丢弃的记录）
    pub fn total_submitted(&self) -> usize {
        self.lock().total
    }

    /// 提交记录中的 identifier 序列
    pub fn submitted_identifiers(&self) -> Vec<&'static str> {
        self.lock()
            .submissions
            .iter()
            .map(|r| r.descriptor.identifier)
            .collect()
    }

    /// 当前挂起的通知
    pub fn pending(&self) -> Vec<NotificationDescriptor> {
        self.lock().pending.clone()
    }

    /// 取走某个 identifier 的挂起通知（用户点击 / 已展示）
    pub fn take_pending(&self, identifier: &str) -> Option<NotificationDescriptor> {
        let mut state = self.lock();
        let pos = state.pending.iter().position(|d| d.identifier == identifier)?;
        Some(state.pending.remove(pos))
    }

    /// 清空提交记录和挂起通知
    pub fn clear(&self) {
        let mut state = self.lock();
        state.submissions.clear();
        state.pending.clear();
        state.total = 0;
    }

    fn lock(&self) -> MutexGuard<'_, MemorySinkState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn submit(&self, descriptor: &NotificationDescriptor) -> Result<SubmitResult> {
        let mut state = self.lock();

        let before = state.pending.len();
        state.pending.retain(|d| d.identifier != descriptor.identifier);
        let replaced = before != state.pending.len();
        state.pending.push(descriptor.clone());

        state.total += 1;
        if self.log_limit > 0 {
            while state.submissions.len() >= self.log_limit {
                state.submissions.pop_front();
            }
            state.submissions.push_back(SubmissionRecord {
                ts: Utc::now(),
                descriptor: descriptor.clone(),
            });
        }

        debug!(
            sink = "memory",
            identifier = descriptor.identifier,
            replaced,
            "Notification recorded"
        );
        Ok(SubmitResult::Submitted)
    }
}
