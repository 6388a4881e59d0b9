//! GraphQL surface of the payroll ledger.
//!
//! The schema is transport-agnostic: callers insert a
//! [`ledger::TenantContext`] into each request's data before execution.
//! The HTTP server derives it from the tenant header; tests inject it
//! directly.

pub mod schema;

/// Header carrying the tenant id on HTTP requests.
pub const TENANT_HEADER: &str = "x-tenant-id";

pub use schema::{AppSchema, build_schema};
