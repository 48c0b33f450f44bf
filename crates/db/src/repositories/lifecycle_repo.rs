//! Cross-table lifecycle service for repair requests.
//!
//! This is the only component that opens transactions: every operation
//! validates its input first, then applies all writes inside a single
//! transaction so concurrent callers see either the pre- or post-state,
//! never a partial one. History rows are appended here and nowhere else.

use fixtrack_core::error::CoreError;
use fixtrack_core::history::{
    validate_vendor_reference, NOTE_ADDED, NOTE_CREATED, NOTE_REACTIVATED, NOTE_REMOVED,
};
use fixtrack_core::membership::{reconcile, validate_device_ids};
use fixtrack_core::sanitize::strip_markup;
use fixtrack_core::status::{
    derive_request_status, DeviceStatus, RequestStatus, VENDOR_ASSIGNMENT_ENABLED,
};
use fixtrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::repair_device::{ChangeDeviceStatus, RepairDevice, RepairDeviceWithHistory};
use crate::models::repair_request::{
    CreateRepairRequest, RepairRequest, RepairRequestDetail, UpdateRepairRequest,
};
use crate::repositories::{repair_device_repo, repair_request_repo};
use crate::repositories::{HistoryRepo, RepairDeviceRepo, RepairRequestRepo};

/// Error type for lifecycle operations: either a domain failure or a
/// persistence failure.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// The repair-request lifecycle service.
pub struct LifecycleRepo;

impl LifecycleRepo {
    // -- Create ---------------------------------------------------------

    /// Create a repair request with its initial device membership: every
    /// device starts at `pending` with one `created` history row.
    ///
    /// All validation happens before any row is written; any failure
    /// leaves the database untouched.
    pub async fn create_request(
        pool: &PgPool,
        input: &CreateRepairRequest,
    ) -> Result<RepairRequestDetail, LifecycleError> {
        let description = strip_markup(&input.description);
        if description.is_empty() {
            return Err(CoreError::validation("description must not be empty").into());
        }
        validate_device_ids(&input.device_ids).map_err(LifecycleError::Core)?;

        let mut tx = pool.begin().await?;

        ensure_device_type_exists(&mut tx, input.device_type_id).await?;
        ensure_user_exists(&mut tx, input.created_by, "creating user").await?;
        if let Some(assignee) = input.assigned_to {
            ensure_user_exists(&mut tx, assignee, "assignee").await?;
        }
        ensure_devices_match_type(&mut tx, &input.device_ids, input.device_type_id).await?;

        let insert = format!(
            "INSERT INTO repair_requests
                (description, severity, location, device_type_id, status, created_by,
                 assigned_to, assigned_by, assigned_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     CASE WHEN $7::bigint IS NULL THEN NULL ELSE $6 END,
                     CASE WHEN $7::bigint IS NULL THEN NULL ELSE NOW() END)
             RETURNING {}",
            repair_request_repo::COLUMNS
        );
        let request = sqlx::query_as::<_, RepairRequest>(&insert)
            .bind(&description)
            .bind(input.severity.as_str())
            .bind(&input.location)
            .bind(input.device_type_id)
            .bind(RequestStatus::Submitted.as_str())
            .bind(input.created_by)
            .bind(input.assigned_to)
            .fetch_one(&mut *tx)
            .await?;

        for device_id in &input.device_ids {
            let repair_device_id =
                insert_member(&mut tx, request.id, *device_id, input.created_by).await?;
            append_history(
                &mut tx,
                repair_device_id,
                DeviceStatus::Pending.as_str(),
                Some(NOTE_CREATED),
                None,
                input.created_by,
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(request_id = request.id, devices = input.device_ids.len(),
            "Repair request created");

        Self::get_request_detail(pool, request.id).await
    }

    // -- Read -----------------------------------------------------------

    /// Fetch a request together with its active device membership.
    pub async fn get_request_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<RepairRequestDetail, LifecycleError> {
        let request = RepairRequestRepo::find_by_id(pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "RepairRequest",
                id,
            })?;
        let devices = RepairDeviceRepo::list_active_details(pool, id).await?;
        Ok(RepairRequestDetail { request, devices })
    }

    // -- Update ---------------------------------------------------------

    /// Update scalar fields, assignment, and/or device membership.
    ///
    /// A request with a non-null assignee is frozen: every content edit is
    /// rejected. Assigning someone is itself the last permitted edit.
    pub async fn update_request(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRepairRequest,
    ) -> Result<RepairRequestDetail, LifecycleError> {
        let mut tx = pool.begin().await?;

        let select = format!(
            "SELECT {} FROM repair_requests WHERE id = $1 AND deleted_at IS NULL",
            repair_request_repo::COLUMNS
        );
        let current = sqlx::query_as::<_, RepairRequest>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "RepairRequest",
                id,
            })?;

        if current.assigned_to.is_some() {
            return Err(
                CoreError::forbidden("repair request is frozen once an assignee is set").into(),
            );
        }

        // The classifier is immutable; resubmitting the current value is
        // tolerated as a no-op.
        if let Some(device_type_id) = input.device_type_id {
            if device_type_id != current.device_type_id {
                return Err(CoreError::validation(
                    "device type cannot be changed after creation",
                )
                .into());
            }
        }

        ensure_user_exists(&mut tx, input.updated_by, "updating user").await?;

        let description = match &input.description {
            Some(raw) => {
                let stripped = strip_markup(raw);
                if stripped.is_empty() {
                    return Err(CoreError::validation("description must not be empty").into());
                }
                Some(stripped)
            }
            None => None,
        };

        sqlx::query(
            "UPDATE repair_requests SET
                description = COALESCE($2, description),
                severity = COALESCE($3, severity),
                location = COALESCE($4, location),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&description)
        .bind(input.severity.map(|s| s.as_str()))
        .bind(&input.location)
        .execute(&mut *tx)
        .await?;

        if let Some(device_ids) = &input.device_ids {
            validate_device_ids(device_ids).map_err(LifecycleError::Core)?;
            ensure_devices_match_type(&mut tx, device_ids, current.device_type_id).await?;
            apply_membership(&mut tx, &current, device_ids, input.updated_by).await?;
        }

        // Assignment is stamped last: it freezes the request for any
        // subsequent update.
        if let Some(assignee) = input.assigned_to {
            ensure_user_exists(&mut tx, assignee, "assignee").await?;
            sqlx::query(
                "UPDATE repair_requests SET
                    assigned_to = $2, assigned_by = $3, assigned_at = NOW(), updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(id)
            .bind(assignee)
            .bind(input.updated_by)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Self::get_request_detail(pool, id).await
    }

    // -- Per-device status change -----------------------------------------

    /// Change one device's repair status, append the history row, and roll
    /// the request's aggregate status up from its active devices — all in
    /// one transaction.
    ///
    /// Vendor assignment is rejected while the feature gate is off.
    /// Transitions outside the table surface as internal errors.
    pub async fn change_device_status(
        pool: &PgPool,
        repair_request_id: DbId,
        device_id: DbId,
        input: &ChangeDeviceStatus,
    ) -> Result<RepairDeviceWithHistory, LifecycleError> {
        if input.status == DeviceStatus::AssignedToVendor && !VENDOR_ASSIGNMENT_ENABLED {
            return Err(CoreError::forbidden("vendor assignment is not enabled").into());
        }
        validate_vendor_reference(input.status, input.vendor_id)
            .map_err(CoreError::Validation)?;

        let mut tx = pool.begin().await?;

        let request_exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM repair_requests WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(repair_request_id)
        .fetch_one(&mut *tx)
        .await?;
        if !request_exists.0 {
            return Err(CoreError::NotFound {
                entity: "RepairRequest",
                id: repair_request_id,
            }
            .into());
        }

        let select = format!(
            "SELECT {} FROM repair_devices
             WHERE repair_request_id = $1 AND device_id = $2 AND deleted_at IS NULL",
            repair_device_repo::COLUMNS
        );
        let device = sqlx::query_as::<_, RepairDevice>(&select)
            .bind(repair_request_id)
            .bind(device_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "RepairDevice",
                id: device_id,
            })?;

        let current = parse_device_status(&device.status)?;
        if !current.can_transition_to(input.status) {
            return Err(CoreError::Internal(format!(
                "status transition '{current}' -> '{}' is not allowed",
                input.status
            ))
            .into());
        }

        ensure_user_exists(&mut tx, input.actor_id, "acting user").await?;
        if let Some(vendor_id) = input.vendor_id {
            ensure_vendor_exists(&mut tx, vendor_id).await?;
        }

        let update = format!(
            "UPDATE repair_devices SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            repair_device_repo::COLUMNS
        );
        let updated = sqlx::query_as::<_, RepairDevice>(&update)
            .bind(device.id)
            .bind(input.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let note = input
            .note
            .as_deref()
            .map(strip_markup)
            .filter(|n| !n.is_empty());
        append_history(
            &mut tx,
            device.id,
            input.status.as_str(),
            note.as_deref(),
            input.vendor_id,
            input.actor_id,
        )
        .await?;

        rollup_request_status(&mut tx, repair_request_id).await?;

        tx.commit().await?;

        let history = HistoryRepo::list_for_device(pool, updated.id).await?;
        Ok(RepairDeviceWithHistory {
            device: updated,
            history,
        })
    }

    // -- Soft delete ------------------------------------------------------

    /// Soft-delete a request and cascade to its active devices.
    ///
    /// Devices already soft-deleted keep their original marker. The
    /// cascade writes no history rows.
    pub async fn delete_request(
        pool: &PgPool,
        id: DbId,
        deleted_by: DbId,
    ) -> Result<RepairRequest, LifecycleError> {
        let mut tx = pool.begin().await?;

        ensure_user_exists(&mut tx, deleted_by, "acting user").await?;

        let update = format!(
            "UPDATE repair_requests
             SET deleted_at = NOW(), deleted_by = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {}",
            repair_request_repo::COLUMNS
        );
        let deleted = sqlx::query_as::<_, RepairRequest>(&update)
            .bind(id)
            .bind(deleted_by)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "RepairRequest",
                id,
            })?;

        sqlx::query(
            "UPDATE repair_devices
             SET deleted_at = NOW(), deleted_by = $2, updated_at = NOW()
             WHERE repair_request_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(deleted_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(request_id = id, "Repair request soft-deleted");

        Ok(deleted)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Reconcile a request's membership against the desired device set and
/// apply the delta with one history row per change.
async fn apply_membership(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    request: &RepairRequest,
    desired: &[DbId],
    actor_id: DbId,
) -> Result<(), LifecycleError> {
    let rows: Vec<(DbId, bool)> = sqlx::query_as(
        "SELECT device_id, deleted_at IS NOT NULL FROM repair_devices
         WHERE repair_request_id = $1",
    )
    .bind(request.id)
    .fetch_all(&mut **tx)
    .await?;

    let active: Vec<DbId> = rows
        .iter()
        .filter(|(_, deleted)| !deleted)
        .map(|(id, _)| *id)
        .collect();
    let inactive: Vec<DbId> = rows
        .iter()
        .filter(|(_, deleted)| *deleted)
        .map(|(id, _)| *id)
        .collect();

    let delta = reconcile(desired, &active, &inactive);

    for device_id in &delta.to_reactivate {
        let row: (DbId,) = sqlx::query_as(
            "UPDATE repair_devices
             SET status = $3, deleted_at = NULL, deleted_by = NULL, updated_at = NOW()
             WHERE repair_request_id = $1 AND device_id = $2
             RETURNING id",
        )
        .bind(request.id)
        .bind(device_id)
        .bind(DeviceStatus::Pending.as_str())
        .fetch_one(&mut **tx)
        .await?;
        append_history(
            tx,
            row.0,
            DeviceStatus::Pending.as_str(),
            Some(NOTE_REACTIVATED),
            None,
            actor_id,
        )
        .await?;
    }

    for device_id in &delta.to_add {
        let repair_device_id = insert_member(tx, request.id, *device_id, actor_id).await?;
        append_history(
            tx,
            repair_device_id,
            DeviceStatus::Pending.as_str(),
            Some(NOTE_ADDED),
            None,
            actor_id,
        )
        .await?;
    }

    for device_id in &delta.to_remove {
        let row: (DbId, String) = sqlx::query_as(
            "UPDATE repair_devices
             SET deleted_at = NOW(), deleted_by = $3, updated_at = NOW()
             WHERE repair_request_id = $1 AND device_id = $2 AND deleted_at IS NULL
             RETURNING id, status",
        )
        .bind(request.id)
        .bind(device_id)
        .bind(actor_id)
        .fetch_one(&mut **tx)
        .await?;
        append_history(tx, row.0, &row.1, Some(NOTE_REMOVED), None, actor_id).await?;
    }

    if !delta.is_empty() {
        tracing::info!(
            request_id = request.id,
            added = delta.to_add.len(),
            reactivated = delta.to_reactivate.len(),
            removed = delta.to_remove.len(),
            "Repair request membership reconciled"
        );
    }

    Ok(())
}

/// Recompute the request's aggregate status from its active devices.
async fn rollup_request_status(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    repair_request_id: DbId,
) -> Result<(), LifecycleError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT status FROM repair_devices
         WHERE repair_request_id = $1 AND deleted_at IS NULL",
    )
    .bind(repair_request_id)
    .fetch_all(&mut **tx)
    .await?;

    let statuses: Vec<DeviceStatus> = rows
        .iter()
        .map(|(s,)| parse_device_status(s))
        .collect::<Result<_, _>>()?;
    let next = derive_request_status(&statuses);

    sqlx::query("UPDATE repair_requests SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(repair_request_id)
        .bind(next.as_str())
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Insert a membership row at `pending`, returning its ID.
async fn insert_member(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    repair_request_id: DbId,
    device_id: DbId,
    created_by: DbId,
) -> Result<DbId, sqlx::Error> {
    let row: (DbId,) = sqlx::query_as(
        "INSERT INTO repair_devices (repair_request_id, device_id, status, created_by)
         VALUES ($1, $2, $3, $4)
         RETURNING id",
    )
    .bind(repair_request_id)
    .bind(device_id)
    .bind(DeviceStatus::Pending.as_str())
    .bind(created_by)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row.0)
}

/// Append one ledger row for a device state change.
async fn append_history(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    repair_device_id: DbId,
    status: &str,
    note: Option<&str>,
    vendor_id: Option<DbId>,
    actor_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO repair_device_history
            (repair_device_id, status, note, vendor_id, actor_id)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(repair_device_id)
    .bind(status)
    .bind(note)
    .bind(vendor_id)
    .bind(actor_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn parse_device_status(value: &str) -> Result<DeviceStatus, CoreError> {
    DeviceStatus::parse(value)
        .ok_or_else(|| CoreError::Internal(format!("unknown stored device status '{value}'")))
}

async fn ensure_device_type_exists(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    device_type_id: DbId,
) -> Result<(), LifecycleError> {
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM device_types WHERE id = $1)")
            .bind(device_type_id)
            .fetch_one(&mut **tx)
            .await?;
    if !exists.0 {
        return Err(CoreError::validation(format!(
            "device type {device_type_id} does not exist"
        ))
        .into());
    }
    Ok(())
}

async fn ensure_user_exists(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: DbId,
    role: &str,
) -> Result<(), LifecycleError> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;
    if !exists.0 {
        return Err(CoreError::validation(format!("{role} {user_id} does not exist")).into());
    }
    Ok(())
}

async fn ensure_vendor_exists(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    vendor_id: DbId,
) -> Result<(), LifecycleError> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vendors WHERE id = $1)")
        .bind(vendor_id)
        .fetch_one(&mut **tx)
        .await?;
    if !exists.0 {
        return Err(CoreError::validation(format!("vendor {vendor_id} does not exist")).into());
    }
    Ok(())
}

/// Verify every requested physical device exists and matches the request's
/// classifier. Fails the whole operation before any mutation.
async fn ensure_devices_match_type(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    device_ids: &[DbId],
    device_type_id: DbId,
) -> Result<(), LifecycleError> {
    let rows: Vec<(DbId, DbId)> =
        sqlx::query_as("SELECT id, device_type_id FROM devices WHERE id = ANY($1)")
            .bind(device_ids.to_vec())
            .fetch_all(&mut **tx)
            .await?;

    for device_id in device_ids {
        match rows.iter().find(|(id, _)| id == device_id) {
            None => {
                return Err(CoreError::validation(format!(
                    "device {device_id} does not exist"
                ))
                .into());
            }
            Some((_, actual_type)) if *actual_type != device_type_id => {
                return Err(CoreError::validation(format!(
                    "device {device_id} does not match device type {device_type_id}"
                ))
                .into());
            }
            Some(_) => {}
        }
    }
    Ok(())
}
