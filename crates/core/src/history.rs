//! History note constants and validation helpers.
//!
//! Every device state change appends exactly one history row; the note
//! column records which kind of event produced it. Defined as constants so
//! the DB and API layers agree on the values.

/// Device row created with the request (or added at creation time).
pub const NOTE_CREATED: &str = "created";

/// Device added to an existing request through a membership update.
pub const NOTE_ADDED: &str = "added";

/// Device removed from the request through a membership update.
pub const NOTE_REMOVED: &str = "removed";

/// Previously removed device restored through a membership update.
pub const NOTE_REACTIVATED: &str = "reactivated";

/// All membership-event notes.
pub const MEMBERSHIP_NOTES: &[&str] = &[NOTE_CREATED, NOTE_ADDED, NOTE_REMOVED, NOTE_REACTIVATED];

/// Validate that a vendor reference only accompanies a vendor assignment.
///
/// The vendor column is only meaningful on `assigned_to_vendor` entries;
/// any other status with a vendor attached is inconsistent input.
pub fn validate_vendor_reference(
    status: crate::status::DeviceStatus,
    vendor_id: Option<crate::types::DbId>,
) -> Result<(), String> {
    if vendor_id.is_some() && status != crate::status::DeviceStatus::AssignedToVendor {
        return Err(format!(
            "vendor reference is only valid for assigned_to_vendor entries, got '{status}'"
        ));
    }
    Ok(())
}
