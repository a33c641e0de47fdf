//! Static notification copy and descriptor construction
//!
//! Each kind has a fixed title/body. Hosts may replace the copy per kind
//! (e.g. with localized strings) through [`Catalog::with_override`].
//! The upstream proxy diagnostic text is appended to the body verbatim, or
//! substituted for a `{message}` placeholder when the copy contains one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::kind::NotificationKind;

/// Placeholder substituted with the upstream proxy diagnostic message
pub const MESSAGE_PLACEHOLDER: &str = "{message}";

/// 通知文案（标题 + 正文）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCopy {
    pub title: String,
    pub body: String,
}

impl NotificationCopy {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// When the OS should present the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Immediate,
}

/// Everything the OS sink needs to present one notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationDescriptor {
    /// Stable per-kind identifier; a new submission replaces a pending one
    pub identifier: &'static str,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub trigger: Trigger,
}

fn default_copy(kind: NotificationKind) -> (&'static str, &'static str) {
    match kind {
        NotificationKind::OpenContainer => (
            "Open the app to connect",
            "The VPN needs the app to be opened before it can finish connecting.",
        ),
        NotificationKind::CorruptSettings => (
            "Settings could not be read",
            "Your settings file is damaged. Open the app to restore the default settings.",
        ),
        NotificationKind::SubscriptionExpired => (
            "Subscription expired",
            "Your subscription has expired. Open the app to renew it.",
        ),
        NotificationKind::RegionUnavailable => (
            "Region unavailable",
            "The selected region is not available right now. Open the app to choose another region.",
        ),
        NotificationKind::UpstreamProxyError => (
            "Upstream proxy error",
            "The VPN could not connect through your upstream proxy.",
        ),
        NotificationKind::DisallowedTraffic => (
            "Some traffic was blocked",
            "Some of your traffic is not supported by the free service. Subscribe to remove this limit.",
        ),
        NotificationKind::MustStartVpnFromApp => (
            "Start the VPN from the app",
            "Without an active subscription the VPN can only be started from the app.",
        ),
        NotificationKind::PurchaseRequired => (
            "Subscription required",
            "Open the app to purchase a subscription and keep using the VPN.",
        ),
    }
}

/// 通知文案表：默认文案 + 宿主覆盖
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    overrides: HashMap<NotificationKind, NotificationCopy>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 覆盖某个 kind 的文案
    pub fn with_override(mut self, kind: NotificationKind, copy: NotificationCopy) -> Self {
        self.overrides.insert(kind, copy);
        self
    }

    pub fn with_overrides(mut self, overrides: HashMap<NotificationKind, NotificationCopy>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    /// 当前生效的文案
    pub fn copy_for(&self, kind: NotificationKind) -> NotificationCopy {
        match self.overrides.get(&kind) {
            Some(copy) => copy.clone(),
            None => {
                let (title, body) = default_copy(kind);
                NotificationCopy::new(title, body)
            }
        }
    }

    /// Build the descriptor for `kind`.
    ///
    /// `message` is only used by [`NotificationKind::UpstreamProxyError`] and is
    /// inserted as-is: no validation, truncation or escaping.
    pub fn descriptor(&self, kind: NotificationKind, message: Option<&str>) -> NotificationDescriptor {
        let copy = self.copy_for(kind);
        let body = match (kind, message) {
            (NotificationKind::UpstreamProxyError, message) => {
                fill_message(&copy.body, message.unwrap_or(""))
            }
            _ => copy.body,
        };

        NotificationDescriptor {
            identifier: kind.as_identifier(),
            kind,
            title: copy.title,
            body,
            trigger: Trigger::Immediate,
        }
    }
}

/// Substitute the placeholder; a body without one gets the message appended.
/// An empty message leaves no trailing separator behind.
fn fill_message(template: &str, message: &str) -> String {
    if template.contains(MESSAGE_PLACEHOLDER) {
        let filled = template.replace(MESSAGE_PLACEHOLDER, message);
        if message.is_empty() {
            filled
                .trim_end_matches(|c: char| c == ':' || c.is_whitespace())
                .to_string()
        } else {
            filled
        }
    } else if message.is_empty() {
        template.to_string()
    } else {
        format!("{}\n\n{}", template, message)
    }
}
