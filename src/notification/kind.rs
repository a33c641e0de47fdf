//! Notification kinds handled by the network extension
//!
//! Every kind maps 1:1 to a stable identifier string. The identifier is used
//! both as the OS notification identifier (so a newer submission replaces the
//! pending one) and as the dedup key. Internal logic only ever deals with
//! [`NotificationKind`]; strings appear at the sink boundary and when a host
//! routes a notification tap back to its kind.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NOTIFICATION_ID_OPEN_CONTAINER: &str = "open-container";
pub const NOTIFICATION_ID_CORRUPT_SETTINGS: &str = "corrupt-settings";
pub const NOTIFICATION_ID_SUBSCRIPTION_EXPIRED: &str = "subscription-expired";
pub const NOTIFICATION_ID_REGION_UNAVAILABLE: &str = "region-unavailable";
pub const NOTIFICATION_ID_UPSTREAM_PROXY_ERROR: &str = "upstream-proxy-error";
pub const NOTIFICATION_ID_DISALLOWED_TRAFFIC: &str = "disallowed-traffic";
pub const NOTIFICATION_ID_MUST_START_VPN_FROM_APP: &str = "must-start-vpn-from-app";
pub const NOTIFICATION_ID_PURCHASE_REQUIRED: &str = "purchase-required";

/// Closed set of conditions the extension can alert the user about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "open-container")]
    OpenContainer,
    #[serde(rename = "corrupt-settings")]
    CorruptSettings,
    #[serde(rename = "subscription-expired")]
    SubscriptionExpired,
    #[serde(rename = "region-unavailable")]
    RegionUnavailable,
    #[serde(rename = "upstream-proxy-error")]
    UpstreamProxyError,
    #[serde(rename = "disallowed-traffic")]
    DisallowedTraffic,
    #[serde(rename = "must-start-vpn-from-app")]
    MustStartVpnFromApp,
    #[serde(rename = "purchase-required")]
    PurchaseRequired,
}

/// Whether a kind may be presented more than once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Presented at most once until the once-only tokens are cleared
    OnceOnly,
    /// Presented on every request
    Repeatable,
}

impl DedupPolicy {
    pub fn is_once_only(&self) -> bool {
        matches!(self, DedupPolicy::OnceOnly)
    }
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 8] = [
        NotificationKind::OpenContainer,
        NotificationKind::CorruptSettings,
        NotificationKind::SubscriptionExpired,
        NotificationKind::RegionUnavailable,
        NotificationKind::UpstreamProxyError,
        NotificationKind::DisallowedTraffic,
        NotificationKind::MustStartVpnFromApp,
        NotificationKind::PurchaseRequired,
    ];

    /// Stable identifier handed to the OS notification subsystem
    pub fn as_identifier(&self) -> &'static str {
        match self {
            NotificationKind::OpenContainer => NOTIFICATION_ID_OPEN_CONTAINER,
            NotificationKind::CorruptSettings => NOTIFICATION_ID_CORRUPT_SETTINGS,
            NotificationKind::SubscriptionExpired => NOTIFICATION_ID_SUBSCRIPTION_EXPIRED,
            NotificationKind::RegionUnavailable => NOTIFICATION_ID_REGION_UNAVAILABLE,
            NotificationKind::UpstreamProxyError => NOTIFICATION_ID_UPSTREAM_PROXY_ERROR,
            NotificationKind::DisallowedTraffic => NOTIFICATION_ID_DISALLOWED_TRAFFIC,
            NotificationKind::MustStartVpnFromApp => NOTIFICATION_ID_MUST_START_VPN_FROM_APP,
            NotificationKind::PurchaseRequired => NOTIFICATION_ID_PURCHASE_REQUIRED,
        }
    }

    /// Map an identifier (e.g. from a tapped notification) back to its kind
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_identifier() == identifier)
    }

    /// Operational errors re-alert every time; resolved-once conditions don't.
    pub fn dedup_policy(&self) -> DedupPolicy {
        match self {
            NotificationKind::UpstreamProxyError | NotificationKind::DisallowedTraffic => {
                DedupPolicy::Repeatable
            }
            NotificationKind::OpenContainer
            | NotificationKind::CorruptSettings
            | NotificationKind::SubscriptionExpired
            | NotificationKind::RegionUnavailable
            | NotificationKind::MustStartVpnFromApp
            | NotificationKind::PurchaseRequired => DedupPolicy::OnceOnly,
        }
    }

    pub fn is_once_only(&self) -> bool {
        self.dedup_policy().is_once_only()
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_identifier())
    }
}

impl FromStr for NotificationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match Self::from_identifier(s.trim()) {
            Some(kind) => Ok(kind),
            None => bail!("Unknown notification identifier: {}", s),
        }
    }
}
