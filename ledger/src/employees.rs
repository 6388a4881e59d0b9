use std::collections::HashMap;

use chrono::Utc;
use entity::{advance, employee, work_entry};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::pagination::{PageInfo, PageRequest, Paged};
use crate::tenant::TenantContext;

#[derive(Clone, Debug)]
pub struct NewEmployee {
    pub name: String,
    pub daily_rate_cents: i64,
    pub half_day_rate_cents: i64,
}

#[derive(Clone, Debug)]
pub struct EmployeeUpdate {
    pub name: String,
    pub daily_rate_cents: i64,
    pub half_day_rate_cents: i64,
}

/// Derived per-employee figures. Computed from the ledger on every read,
/// never stored.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EmployeeStats {
    pub full_days: u64,
    pub half_days: u64,
    pub extras_cents: i64,
    pub to_pay_cents: i64,
    pub advances_cents: i64,
}

#[derive(Clone, Debug)]
pub struct EmployeeWithStats {
    pub employee: employee::Model,
    pub stats: EmployeeStats,
}

#[derive(Clone, Debug)]
pub struct EmployeeDetail {
    pub employee: employee::Model,
    pub stats: EmployeeStats,
    pub work_history: Paged<work_entry::Model>,
    pub advances: Paged<advance::Model>,
}

pub async fn create(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    input: NewEmployee,
) -> LedgerResult<employee::Model> {
    let name = validate_name(&input.name)?;
    validate_rates(input.daily_rate_cents, input.half_day_rate_cents)?;
    ensure_name_available(db, tenant, &name, None).await?;

    let now = Utc::now().into();
    employee::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant.tenant_id),
        name: Set(name),
        daily_rate_cents: Set(input.daily_rate_cents),
        half_day_rate_cents: Set(input.half_day_rate_cents),
        is_active: Set(true),
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
    input: EmployeeUpdate,
) -> LedgerResult<employee::Model> {
    let name = validate_name(&input.name)?;
    validate_rates(input.daily_rate_cents, input.half_day_rate_cents)?;
    let existing = find_owned(db, tenant, id).await?;
    ensure_name_available(db, tenant, &name, Some(id)).await?;

    let mut active: employee::ActiveModel = existing.into();
    active.name = Set(name);
    active.daily_rate_cents = Set(input.daily_rate_cents);
    active.half_day_rate_cents = Set(input.half_day_rate_cents);
    active.updated_at = Set(Utc::now().into());
    active.update(db).await.map_err(LedgerError::from)
}

pub async fn toggle_active(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    id: Uuid,
) -> LedgerResult<employee::Model> {
    let existing = find_owned(db, tenant, id).await?;
    let flipped = !existing.is_active;
    let mut active: employee::ActiveModel = existing.into();
    active.is_active = Set(flipped);
    active.updated_at = Set(Utc::now().into());
    active.update(db).await.map_err(LedgerError::from)
}

/// Hard delete: removes the employee together with every work entry and
/// advance it owns, in one transaction.
pub async fn delete(db: &DatabaseConnection, tenant: &TenantContext, id: Uuid) -> LedgerResult<()> {
    let existing = find_owned(db, tenant, id).await?;
    let txn = db.begin().await?;
    work_entry::Entity::delete_many()
        .filter(work_entry::Column::TenantId.eq(tenant.tenant_id))
        .filter(work_entry::Column::EmployeeId.eq(existing.id))
        .exec(&txn)
        .await?;
    advance::Entity::delete_many()
        .filter(advance::Column::TenantId.eq(tenant.tenant_id))
        .filter(advance::Column::EmployeeId.eq(existing.id))
        .exec(&txn)
        .await?;
    employee::Entity::delete_many()
        .filter(employee::Column::TenantId.eq(tenant.tenant_id))
        .filter(employee::Column::Id.eq(existing.id))
        .exec(&txn)
        .await?;
    txn.commit().await?;
    Ok(())
}

pub async fn list(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    search: Option<&str>,
    is_active: Option<bool>,
    page: PageRequest,
) -> LedgerResult<Paged<EmployeeWithStats>> {
    let mut query =
        employee::Entity::find().filter(employee::Column::TenantId.eq(tenant.tenant_id));
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", term.to_lowercase());
        query = query
            .filter(Expr::expr(Func::lower(Expr::col(employee::Column::Name))).like(pattern));
    }
    if let Some(flag) = is_active {
        query = query.filter(employee::Column::IsActive.eq(flag));
    }

    let total = query.clone().count(db).await?;
    let records = query
        .order_by_asc(employee::Column::Name)
        .limit(page.limit())
        .offset(page.offset())
        .all(db)
        .await?;

    let ids: Vec<Uuid> = records.iter().map(|e| e.id).collect();
    let mut stats = load_stats(db, tenant, &ids).await?;
    let items = records
        .into_iter()
        .map(|employee| {
            let stats = stats.remove(&employee.id).unwrap_or_default();
            EmployeeWithStats { employee, stats }
        })
        .collect();
    Ok(Paged {
        items,
        page_info: PageInfo::new(&page, total),
    })
}

pub async fn get(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    id: Uuid,
    history_page: PageRequest,
    advances_page: PageRequest,
) -> LedgerResult<EmployeeDetail> {
    let model = find_owned(db, tenant, id).await?;
    let mut stats = load_stats(db, tenant, &[id]).await?;

    let history_query = work_entry::Entity::find()
        .filter(work_entry::Column::TenantId.eq(tenant.tenant_id))
        .filter(work_entry::Column::EmployeeId.eq(id));
    let history_total = history_query.clone().count(db).await?;
    let history = history_query
        .order_by_desc(work_entry::Column::WorkedDay)
        .order_by_desc(work_entry::Column::CreatedAt)
        .limit(history_page.limit())
        .offset(history_page.offset())
        .all(db)
        .await?;

    let advances_query = advance::Entity::find()
        .filter(advance::Column::TenantId.eq(tenant.tenant_id))
        .filter(advance::Column::EmployeeId.eq(id));
    let advances_total = advances_query.clone().count(db).await?;
    let advances = advances_query
        .order_by_desc(advance::Column::Date)
        .limit(advances_page.limit())
        .offset(advances_page.offset())
        .all(db)
        .await?;

    Ok(EmployeeDetail {
        employee: model,
        stats: stats.remove(&id).unwrap_or_default(),
        work_history: Paged {
            items: history,
            page_info: PageInfo::new(&history_page, history_total),
        },
        advances: Paged {
            items: advances,
            page_info: PageInfo::new(&advances_page, advances_total),
        },
    })
}

/// Fetch an employee scoped to the tenant; a row owned by someone else
/// surfaces as the same `NotFound` as a missing row.
pub(crate) async fn find_owned(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    id: Uuid,
) -> LedgerResult<employee::Model> {
    employee::Entity::find()
        .filter(employee::Column::Id.eq(id))
        .filter(employee::Column::TenantId.eq(tenant.tenant_id))
        .one(db)
        .await?
        .ok_or(LedgerError::NotFound("employee"))
}

async fn load_stats(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    employee_ids: &[Uuid],
) -> LedgerResult<HashMap<Uuid, EmployeeStats>> {
    let mut stats: HashMap<Uuid, EmployeeStats> = HashMap::new();
    if employee_ids.is_empty() {
        return Ok(stats);
    }

    let entries = work_entry::Entity::find()
        .filter(work_entry::Column::TenantId.eq(tenant.tenant_id))
        .filter(work_entry::Column::EmployeeId.is_in(employee_ids.to_vec()))
        .all(db)
        .await?;
    for entry in entries {
        let slot = stats.entry(entry.employee_id).or_default();
        match entry.work_type {
            work_entry::WorkType::FullDay => slot.full_days += 1,
            work_entry::WorkType::HalfDay => slot.half_days += 1,
        }
        slot.extras_cents += entry.extras_cents;
        if !entry.is_paid {
            slot.to_pay_cents += (entry.total_cents - entry.payed_amount_cents).max(0);
        }
    }

    let advances = advance::Entity::find()
        .filter(advance::Column::TenantId.eq(tenant.tenant_id))
        .filter(advance::Column::EmployeeId.is_in(employee_ids.to_vec()))
        .all(db)
        .await?;
    for advance in advances {
        stats.entry(advance.employee_id).or_default().advances_cents += advance.amount_cents;
    }

    Ok(stats)
}

fn validate_name(raw: &str) -> LedgerResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("name must not be empty"));
    }
    Ok(name.to_string())
}

fn validate_rates(daily_rate_cents: i64, half_day_rate_cents: i64) -> LedgerResult<()> {
    if daily_rate_cents <= 0 {
        return Err(LedgerError::validation("dailyRate must be positive"));
    }
    if half_day_rate_cents <= 0 {
        return Err(LedgerError::validation("halfDayRate must be positive"));
    }
    Ok(())
}

async fn ensure_name_available(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    name: &str,
    exclude: Option<Uuid>,
) -> LedgerResult<()> {
    let mut query = employee::Entity::find()
        .filter(employee::Column::TenantId.eq(tenant.tenant_id))
        .filter(Expr::expr(Func::lower(Expr::col(employee::Column::Name))).eq(name.to_lowercase()));
    if let Some(id) = exclude {
        query = query.filter(employee::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(LedgerError::DuplicateName);
    }
    Ok(())
}
