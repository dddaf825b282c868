//! irecord-store
//!
//! Persistence and service layer for the Innovation Record service:
//! - sqlite-backed storage for the innovation aggregate (innovation,
//!   document + draft, sections, supports, shares, export requests)
//! - append-only schema registry with content digests
//! - service operations with typed errors, executed inside transactions
//!   whenever more than one table is touched
//! - activity log written as a side effect of every mutating operation
//!
//! All operations are synchronous request-scoped units of work; there is no
//! background processing and no retry logic. Failures surface immediately as
//! `ServiceError` values for the caller to map.

pub mod activity_log;
pub mod db;
pub mod documents;
pub mod entities;
pub mod errors;
pub mod export_requests;
pub mod innovations;
pub mod schema_registry;

pub use crate::db::Store;
pub use crate::errors::{ErrorCode, ServiceError, ServiceResult};
