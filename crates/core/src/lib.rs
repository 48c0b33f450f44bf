//! Pure domain logic for the repair-request lifecycle engine.
//!
//! This crate has no I/O: the transition table, status roll-up, and
//! membership reconciliation are plain functions over plain types so they
//! can be unit-tested without a database. Persistence lives in
//! `fixtrack-db`, HTTP in `fixtrack-api`.

pub mod error;
pub mod history;
pub mod membership;
pub mod paging;
pub mod sanitize;
pub mod severity;
pub mod status;
pub mod types;
