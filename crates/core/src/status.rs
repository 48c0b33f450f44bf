//! Repair status enums, the device transition table, and the status roll-up.
//!
//! The transition table is owned here as explicit data rather than spread
//! across call sites: `allowed_targets` is the single source of truth for
//! which per-device moves are legal, and [`derive_request_status`] is the
//! single source of truth for how device statuses aggregate into the
//! request status.

use serde::{Deserialize, Serialize};

/// Aggregate status of a repair request.
///
/// Never written directly by callers: requests start at `Submitted` and
/// every later value is derived from the member devices via
/// [`derive_request_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Submitted,
    InProgress,
    Completed,
}

impl RequestStatus {
    /// Every status bucket, in reporting order. Summary reports zero-fill
    /// against this list so empty buckets still appear.
    pub const BUCKETS: &'static [RequestStatus] =
        &[Self::Submitted, Self::InProgress, Self::Completed];

    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Parse a stored string back into a request status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "submitted" => Some(Self::Submitted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-device repair status within one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Pending,
    AssignedToVendor,
    Fixed,
    Retired,
}

/// Vendor assignment is a guarded-but-inactive transition: the edge exists
/// in the table below, but the lifecycle service rejects it while this is
/// `false`.
pub const VENDOR_ASSIGNMENT_ENABLED: bool = false;

impl DeviceStatus {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::AssignedToVendor => "assigned_to_vendor",
            Self::Fixed => "fixed",
            Self::Retired => "retired",
        }
    }

    /// Parse a stored string back into a device status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "assigned_to_vendor" => Some(Self::AssignedToVendor),
            "fixed" => Some(Self::Fixed),
            "retired" => Some(Self::Retired),
            _ => None,
        }
    }

    /// `true` if the status no longer counts toward "in progress".
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Fixed | Self::Retired)
    }

    /// Legal target statuses from this status.
    ///
    /// Terminal statuses have no outgoing edges; a device that is fixed or
    /// retired only re-enters the flow through membership reactivation,
    /// which resets it to `Pending`.
    pub fn allowed_targets(&self) -> &'static [DeviceStatus] {
        match self {
            Self::Pending => &[Self::AssignedToVendor, Self::Fixed, Self::Retired],
            Self::AssignedToVendor => &[Self::Pending, Self::Fixed, Self::Retired],
            Self::Fixed => &[],
            Self::Retired => &[],
        }
    }

    /// Check whether a transition from `self` to `target` is legal.
    pub fn can_transition_to(&self, target: DeviceStatus) -> bool {
        self.allowed_targets().contains(&target)
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roll up the active devices' statuses into the request status.
///
/// Any active device outside the terminal set keeps the request
/// `InProgress`; once every active device is fixed or retired the request
/// is `Completed`. An empty slice also yields `Completed` — callers only
/// invoke the roll-up on the status-change path, never at creation, so
/// zero active devices means every member has reached a terminal state or
/// been removed.
pub fn derive_request_status(active: &[DeviceStatus]) -> RequestStatus {
    if active.iter().any(|s| !s.is_terminal()) {
        RequestStatus::InProgress
    } else {
        RequestStatus::Completed
    }
}
