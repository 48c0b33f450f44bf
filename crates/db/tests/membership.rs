//! Integration tests for device membership reconciliation.
//!
//! Membership updates go through `LifecycleRepo::update_request` with a
//! desired `device_ids` set; the service computes the add / reactivate /
//! remove delta and records each move in the history ledger.

use assert_matches::assert_matches;
use fixtrack_core::error::CoreError;
use fixtrack_core::severity::Severity;
use fixtrack_core::status::DeviceStatus;
use fixtrack_core::types::DbId;
use sqlx::PgPool;

use fixtrack_db::models::device::{CreateDevice, CreateDeviceType};
use fixtrack_db::models::repair_device::ChangeDeviceStatus;
use fixtrack_db::models::repair_request::{CreateRepairRequest, UpdateRepairRequest};
use fixtrack_db::models::user::CreateUser;
use fixtrack_db::repositories::{
    DeviceRepo, DeviceTypeRepo, HistoryRepo, LifecycleError, LifecycleRepo, RepairDeviceRepo,
    RepairRequestRepo, UserRepo,
};

struct Fixture {
    user_id: DbId,
    device_type_id: DbId,
    device_ids: Vec<DbId>,
}

async fn fixture(pool: &PgPool, count: usize) -> Fixture {
    let suffix = format!("{:x}", std::time::UNIX_EPOCH.elapsed().unwrap().as_nanos());
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Membership Tech".to_string(),
            email: format!("member-{suffix}@example.com"),
        },
    )
    .await
    .unwrap();
    let device_type = DeviceTypeRepo::create(
        pool,
        &CreateDeviceType {
            name: format!("monitor-{suffix}"),
        },
    )
    .await
    .unwrap();

    let mut device_ids = Vec::with_capacity(count);
    for i in 0..count {
        let device = DeviceRepo::create(
            pool,
            &CreateDevice {
                device_type_id: device_type.id,
                asset_tag: format!("MON-{suffix}-{i}"),
                name: format!("Monitor {i}"),
            },
        )
        .await
        .unwrap();
        device_ids.push(device.id);
    }

    Fixture {
        user_id: user.id,
        device_type_id: device_type.id,
        device_ids,
    }
}

async fn create_with(pool: &PgPool, fx: &Fixture, device_ids: Vec<DbId>) -> DbId {
    LifecycleRepo::create_request(
        pool,
        &CreateRepairRequest {
            description: "Flickering monitors".to_string(),
            severity: Severity::Medium,
            location: None,
            device_type_id: fx.device_type_id,
            device_ids,
            assigned_to: None,
            created_by: fx.user_id,
        },
    )
    .await
    .unwrap()
    .request
    .id
}

fn membership_update(fx: &Fixture, device_ids: Vec<DbId>) -> UpdateRepairRequest {
    UpdateRepairRequest {
        description: None,
        severity: None,
        location: None,
        device_type_id: None,
        assigned_to: None,
        device_ids: Some(device_ids),
        updated_by: fx.user_id,
    }
}

#[sqlx::test]
async fn test_swap_removes_and_adds(pool: PgPool) {
    let fx = fixture(&pool, 4).await;
    let [a, b, c, d] = fx.device_ids[..] else {
        unreachable!()
    };
    let request_id = create_with(&pool, &fx, vec![a, b, c]).await;

    // Desired set [b, c, d]: a is removed, d is added, b and c untouched.
    let detail = LifecycleRepo::update_request(&pool, request_id, &membership_update(&fx, vec![b, c, d]))
        .await
        .unwrap();

    let mut active: Vec<DbId> = detail.devices.iter().map(|x| x.device_id).collect();
    active.sort_unstable();
    assert_eq!(active, vec![b, c, d]);

    let rows = RepairDeviceRepo::list_for_request_include_deleted(&pool, request_id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 4);

    let removed = rows.iter().find(|r| r.device_id == a).unwrap();
    assert!(removed.deleted_at.is_some());
    assert_eq!(removed.deleted_by, Some(fx.user_id));
    let removal_history = HistoryRepo::list_for_device(&pool, removed.id).await.unwrap();
    assert_eq!(removal_history.len(), 2);
    assert_eq!(removal_history[1].note.as_deref(), Some("removed"));

    let added = rows.iter().find(|r| r.device_id == d).unwrap();
    assert_eq!(added.status, "pending");
    let add_history = HistoryRepo::list_for_device(&pool, added.id).await.unwrap();
    assert_eq!(add_history.len(), 1);
    assert_eq!(add_history[0].note.as_deref(), Some("added"));
}

#[sqlx::test]
async fn test_resubmitting_same_set_is_idempotent(pool: PgPool) {
    let fx = fixture(&pool, 2).await;
    let request_id = create_with(&pool, &fx, fx.device_ids.clone()).await;

    let before: Vec<i64> = history_counts(&pool, request_id).await;
    LifecycleRepo::update_request(
        &pool,
        request_id,
        &membership_update(&fx, fx.device_ids.clone()),
    )
    .await
    .unwrap();
    let after: Vec<i64> = history_counts(&pool, request_id).await;

    assert_eq!(before, after, "unchanged membership must write no history");
}

#[sqlx::test]
async fn test_reactivation_reuses_the_row_and_resets_status(pool: PgPool) {
    let fx = fixture(&pool, 2).await;
    let [a, b] = fx.device_ids[..] else {
        unreachable!()
    };
    let request_id = create_with(&pool, &fx, vec![a, b]).await;

    // Fix device a so reactivation visibly resets its status.
    LifecycleRepo::change_device_status(
        &pool,
        request_id,
        a,
        &ChangeDeviceStatus {
            status: DeviceStatus::Fixed,
            actor_id: fx.user_id,
            vendor_id: None,
            note: None,
        },
    )
    .await
    .unwrap();

    // Remove it, then bring it back.
    LifecycleRepo::update_request(&pool, request_id, &membership_update(&fx, vec![b]))
        .await
        .unwrap();
    LifecycleRepo::update_request(&pool, request_id, &membership_update(&fx, vec![a, b]))
        .await
        .unwrap();

    let rows = RepairDeviceRepo::list_for_request_include_deleted(&pool, request_id)
        .await
        .unwrap();
    // The original row was reused, not duplicated.
    assert_eq!(rows.iter().filter(|r| r.device_id == a).count(), 1);

    let row = rows.iter().find(|r| r.device_id == a).unwrap();
    assert!(row.deleted_at.is_none());
    assert_eq!(row.status, "pending", "reactivation resets to pending");

    let history = HistoryRepo::list_for_device(&pool, row.id).await.unwrap();
    let notes: Vec<&str> = history.iter().filter_map(|h| h.note.as_deref()).collect();
    assert_eq!(notes, vec!["created", "removed", "reactivated"]);
}

#[sqlx::test]
async fn test_membership_update_does_not_touch_request_status(pool: PgPool) {
    let fx = fixture(&pool, 3).await;
    let [a, b, c] = fx.device_ids[..] else {
        unreachable!()
    };
    let request_id = create_with(&pool, &fx, vec![a, b]).await;

    // Fix both members: the request rolls up to completed.
    for device_id in [a, b] {
        LifecycleRepo::change_device_status(
            &pool,
            request_id,
            device_id,
            &ChangeDeviceStatus {
                status: DeviceStatus::Fixed,
                actor_id: fx.user_id,
                vendor_id: None,
                note: None,
            },
        )
        .await
        .unwrap();
    }

    // Adding a fresh pending device changes membership but the roll-up
    // only runs on the status-change path.
    LifecycleRepo::update_request(&pool, request_id, &membership_update(&fx, vec![a, b, c]))
        .await
        .unwrap();

    let request = RepairRequestRepo::find_by_id(&pool, request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.status, "completed");
}

#[sqlx::test]
async fn test_membership_rejects_empty_and_duplicates(pool: PgPool) {
    let fx = fixture(&pool, 2).await;
    let request_id = create_with(&pool, &fx, fx.device_ids.clone()).await;

    let err = LifecycleRepo::update_request(&pool, request_id, &membership_update(&fx, vec![]))
        .await
        .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Validation(_)));

    let err = LifecycleRepo::update_request(
        &pool,
        request_id,
        &membership_update(&fx, vec![fx.device_ids[0], fx.device_ids[0]]),
    )
    .await
    .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Validation(_)));
}

#[sqlx::test]
async fn test_membership_rejects_foreign_classifier(pool: PgPool) {
    let fx = fixture(&pool, 1).await;
    let other = fixture(&pool, 1).await;
    let request_id = create_with(&pool, &fx, fx.device_ids.clone()).await;

    let err = LifecycleRepo::update_request(
        &pool,
        request_id,
        &membership_update(&fx, vec![fx.device_ids[0], other.device_ids[0]]),
    )
    .await
    .unwrap_err();
    assert_matches!(err, LifecycleError::Core(CoreError::Validation(_)));

    // The failed update left membership intact.
    let rows = RepairDeviceRepo::list_for_request_include_deleted(&pool, request_id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].deleted_at.is_none());
}

async fn history_counts(pool: &PgPool, request_id: DbId) -> Vec<i64> {
    let rows = RepairDeviceRepo::list_for_request_include_deleted(pool, request_id)
        .await
        .unwrap();
    let mut counts = Vec::with_capacity(rows.len());
    for row in rows {
        counts.push(HistoryRepo::count_for_device(pool, row.id).await.unwrap());
    }
    counts
}
