use uuid::Uuid;

/// Authenticated tenant scope for a single unit of work.
///
/// The boundary (HTTP layer, tests) builds one from an already-authenticated
/// principal; core operations never run without it, which is what makes
/// cross-tenant access indistinguishable from "not found".
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TenantContext {
    pub tenant_id: Uuid,
}

impl TenantContext {
    pub fn new(tenant_id: Uuid) -> Self {
        Self { tenant_id }
    }
}
