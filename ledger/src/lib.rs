//! Payroll ledger core.
//!
//! Tenant-scoped operations over employees, daily work entries and cash
//! advances, plus the payment allocator and the report aggregator. The
//! HTTP/GraphQL surface lives in the `api` crate; everything here takes an
//! already-authenticated [`tenant::TenantContext`] and a database handle.

pub mod advances;
pub mod employees;
pub mod error;
pub mod keywords;
pub mod pagination;
pub mod payments;
pub mod reports;
pub mod tenant;
pub mod work_entries;

pub use error::{LedgerError, LedgerResult};
pub use tenant::TenantContext;
