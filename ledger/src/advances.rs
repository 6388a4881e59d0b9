use chrono::Utc;
use entity::advance;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::pagination::{PageInfo, PageRequest, Paged};
use crate::tenant::TenantContext;

#[derive(Clone, Debug)]
pub struct NewAdvance {
    pub employee_id: Uuid,
    pub amount_cents: i64,
    /// Defaults to now; an advance is dated by when the cash moved, not by
    /// any work day.
    pub date: Option<DateTimeWithTimeZone>,
    pub notes: Option<String>,
}

/// Editable fields of an advance. Amount changes never re-trigger
/// allocation against work entries.
#[derive(Clone, Debug, Default)]
pub struct AdvanceUpdate {
    pub amount_cents: Option<i64>,
    pub date: Option<DateTimeWithTimeZone>,
    pub notes: Option<String>,
}

pub async fn create(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    input: NewAdvance,
) -> LedgerResult<advance::Model> {
    if input.amount_cents <= 0 {
        return Err(LedgerError::validation("advance amount must be positive"));
    }
    crate::employees::find_owned(db, tenant, input.employee_id).await?;

    let now: DateTimeWithTimeZone = Utc::now().into();
    advance::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant.tenant_id),
        employee_id: Set(input.employee_id),
        amount_cents: Set(input.amount_cents),
        date: Set(input.date.unwrap_or(now)),
        notes: Set(input.notes),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .map_err(LedgerError::from)
}

pub async fn update(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    id: Uuid,
    input: AdvanceUpdate,
) -> LedgerResult<advance::Model> {
    if let Some(amount) = input.amount_cents {
        if amount <= 0 {
            return Err(LedgerError::validation("advance amount must be positive"));
        }
    }
    let existing = find_owned(db, tenant, id).await?;

    let mut active: advance::ActiveModel = existing.into();
    if let Some(amount) = input.amount_cents {
        active.amount_cents = Set(amount);
    }
    if let Some(date) = input.date {
        active.date = Set(date);
    }
    if let Some(notes) = input.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(Utc::now().into());
    active.update(db).await.map_err(LedgerError::from)
}

pub async fn delete(db: &DatabaseConnection, tenant: &TenantContext, id: Uuid) -> LedgerResult<()> {
    let result = advance::Entity::delete_many()
        .filter(advance::Column::TenantId.eq(tenant.tenant_id))
        .filter(advance::Column::Id.eq(id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(LedgerError::NotFound("advance"));
    }
    Ok(())
}

pub async fn list(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    employee_id: Uuid,
    page: PageRequest,
) -> LedgerResult<Paged<advance::Model>> {
    let query = advance::Entity::find()
        .filter(advance::Column::TenantId.eq(tenant.tenant_id))
        .filter(advance::Column::EmployeeId.eq(employee_id));
    let total = query.clone().count(db).await?;
    let items = query
        .order_by_desc(advance::Column::Date)
        .limit(page.limit())
        .offset(page.offset())
        .all(db)
        .await?;
    Ok(Paged {
        items,
        page_info: PageInfo::new(&page, total),
    })
}

async fn find_owned(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    id: Uuid,
) -> LedgerResult<advance::Model> {
    advance::Entity::find()
        .filter(advance::Column::Id.eq(id))
        .filter(advance::Column::TenantId.eq(tenant.tenant_id))
        .one(db)
        .await?
        .ok_or(LedgerError::NotFound("advance"))
}
