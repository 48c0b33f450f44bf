//! Membership reconciliation for a repair request's device set.
//!
//! Given the caller's desired set of physical device IDs and the request's
//! current rows (active and soft-deleted), compute the typed delta to
//! apply. The function is pure set algebra; applying the delta (and its
//! history rows) is the lifecycle service's job.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// The changes needed to move a request's membership to a desired set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipDelta {
    /// Devices never before associated with this request: create fresh rows.
    pub to_add: Vec<DbId>,
    /// Devices previously removed from this request: clear the soft-delete
    /// marker and reset status to pending.
    pub to_reactivate: Vec<DbId>,
    /// Active devices absent from the desired set: soft-delete.
    pub to_remove: Vec<DbId>,
}

impl MembershipDelta {
    /// `true` when the desired set already matches the active set.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_reactivate.is_empty() && self.to_remove.is_empty()
    }
}

/// Validate a caller-supplied device-ID list: non-empty and duplicate-free.
pub fn validate_device_ids(ids: &[DbId]) -> Result<(), CoreError> {
    if ids.is_empty() {
        return Err(CoreError::validation("device list must not be empty"));
    }
    let unique: HashSet<DbId> = ids.iter().copied().collect();
    if unique.len() != ids.len() {
        return Err(CoreError::validation("device list contains duplicate ids"));
    }
    Ok(())
}

/// Compute the add/reactivate/remove delta between the desired device set
/// and the request's current rows.
///
/// `active` and `inactive` are the physical device IDs of the request's
/// live and soft-deleted rows respectively. Results are sorted for
/// deterministic apply order. Reconciling against the same desired set
/// twice yields an empty delta on the second pass.
pub fn reconcile(desired: &[DbId], active: &[DbId], inactive: &[DbId]) -> MembershipDelta {
    let desired: HashSet<DbId> = desired.iter().copied().collect();
    let active: HashSet<DbId> = active.iter().copied().collect();
    let inactive: HashSet<DbId> = inactive.iter().copied().collect();

    let mut to_reactivate: Vec<DbId> = desired
        .iter()
        .filter(|id| !active.contains(id) && inactive.contains(id))
        .copied()
        .collect();
    let mut to_add: Vec<DbId> = desired
        .iter()
        .filter(|id| !active.contains(id) && !inactive.contains(id))
        .copied()
        .collect();
    let mut to_remove: Vec<DbId> = active
        .iter()
        .filter(|id| !desired.contains(id))
        .copied()
        .collect();

    to_add.sort_unstable();
    to_reactivate.sort_unstable();
    to_remove.sort_unstable();

    MembershipDelta {
        to_add,
        to_reactivate,
        to_remove,
    }
}
