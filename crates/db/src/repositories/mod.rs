//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. [`LifecycleRepo`] is the
//! cross-table lifecycle service and the only component that opens
//! transactions.

pub mod device_repo;
pub mod device_type_repo;
pub mod history_repo;
pub mod lifecycle_repo;
pub mod repair_device_repo;
pub mod repair_request_repo;
pub mod user_repo;
pub mod vendor_repo;

pub use device_repo::DeviceRepo;
pub use device_type_repo::DeviceTypeRepo;
pub use history_repo::HistoryRepo;
pub use lifecycle_repo::{LifecycleError, LifecycleRepo};
pub use repair_device_repo::RepairDeviceRepo;
pub use repair_request_repo::{RepairRequestFilter, RepairRequestRepo};
pub use user_repo::UserRepo;
pub use vendor_repo::VendorRepo;
