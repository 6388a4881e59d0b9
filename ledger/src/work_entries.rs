use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate, Utc};
use entity::work_entry::{self, WorkType};
use entity::{employee, work_entry::Entity as WorkEntry};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::keywords::extract_keywords;
use crate::tenant::TenantContext;

/// Input for a single work entry. `total` and `is_paid` are never part of
/// the input: both are derived here, regardless of what a caller claims.
#[derive(Clone, Debug)]
pub struct NewWorkEntry {
    pub employee_id: Uuid,
    pub worked_day: NaiveDate,
    pub work_type: WorkType,
    pub salary_amount_cents: i64,
    pub extras_cents: i64,
    pub payed_amount_cents: i64,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct WorkEntryFilter {
    pub employee_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub is_paid: Option<bool>,
    pub work_type: Option<WorkType>,
    pub notes_keyword: Option<String>,
}

/// Filtered rows plus the derived figures the dashboard needs alongside
/// them: activity years, day counts, paid/outstanding totals and the
/// keyword facet mined from matching notes.
#[derive(Clone, Debug)]
pub struct WorkEntryQueryResult {
    pub entries: Vec<work_entry::Model>,
    pub years: Vec<i32>,
    pub full_days: u64,
    pub half_days: u64,
    pub total_payed_cents: i64,
    pub total_to_pay_cents: i64,
    pub keywords: Vec<String>,
}

pub async fn create(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    input: NewWorkEntry,
) -> LedgerResult<work_entry::Model> {
    validate(&input)?;
    crate::employees::find_owned(db, tenant, input.employee_id).await?;
    build_model(tenant, input, Utc::now().into())
        .insert(db)
        .await
        .map_err(LedgerError::from)
}

/// Batch creation is all-or-nothing: every row is validated and every
/// referenced employee must belong to the tenant before anything is
/// written, and the inserts share one transaction.
pub async fn create_batch(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    inputs: Vec<NewWorkEntry>,
) -> LedgerResult<Vec<work_entry::Model>> {
    if inputs.is_empty() {
        return Err(LedgerError::validation("at least one entry is required"));
    }
    for input in &inputs {
        validate(input)?;
    }

    let employee_ids: HashSet<Uuid> = inputs.iter().map(|e| e.employee_id).collect();
    let owned = employee::Entity::find()
        .filter(employee::Column::TenantId.eq(tenant.tenant_id))
        .filter(employee::Column::Id.is_in(employee_ids.iter().copied().collect::<Vec<_>>()))
        .all(db)
        .await?;
    if owned.len() != employee_ids.len() {
        return Err(LedgerError::NotFound("employee"));
    }

    let txn = db.begin().await?;
    let now = Utc::now().into();
    let mut created = Vec::with_capacity(inputs.len());
    for input in inputs {
        let model = build_model(tenant, input, now).insert(&txn).await?;
        created.push(model);
    }
    txn.commit().await?;
    Ok(created)
}

pub async fn delete(db: &DatabaseConnection, tenant: &TenantContext, id: Uuid) -> LedgerResult<()> {
    let result = WorkEntry::delete_many()
        .filter(work_entry::Column::TenantId.eq(tenant.tenant_id))
        .filter(work_entry::Column::Id.eq(id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(LedgerError::NotFound("work entry"));
    }
    Ok(())
}

pub async fn query(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    filter: WorkEntryFilter,
) -> LedgerResult<WorkEntryQueryResult> {
    let mut select =
        WorkEntry::find().filter(work_entry::Column::TenantId.eq(tenant.tenant_id));
    if let Some(employee_id) = filter.employee_id {
        select = select.filter(work_entry::Column::EmployeeId.eq(employee_id));
    }
    if let Some(from) = filter.from {
        select = select.filter(work_entry::Column::WorkedDay.gte(from));
    }
    if let Some(to) = filter.to {
        select = select.filter(work_entry::Column::WorkedDay.lte(to));
    }
    if let Some(is_paid) = filter.is_paid {
        select = select.filter(work_entry::Column::IsPaid.eq(is_paid));
    }
    if let Some(work_type) = filter.work_type {
        select = select.filter(work_entry::Column::WorkType.eq(work_type));
    }
    if let Some(keyword) = filter
        .notes_keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        let pattern = format!("%{}%", keyword.to_lowercase());
        select = select
            .filter(Expr::expr(Func::lower(Expr::col(work_entry::Column::Notes))).like(pattern));
    }

    let entries = select
        .order_by_desc(work_entry::Column::WorkedDay)
        .order_by_desc(work_entry::Column::CreatedAt)
        .all(db)
        .await?;

    let mut full_days = 0;
    let mut half_days = 0;
    let mut total_payed_cents = 0;
    let mut total_to_pay_cents = 0;
    for entry in &entries {
        match entry.work_type {
            WorkType::FullDay => full_days += 1,
            WorkType::HalfDay => half_days += 1,
        }
        total_payed_cents += entry.payed_amount_cents;
        total_to_pay_cents += (entry.total_cents - entry.payed_amount_cents).max(0);
    }

    let keywords = extract_keywords(entries.iter().filter_map(|e| e.notes.as_deref()));
    let years = activity_years(db, tenant).await?;

    Ok(WorkEntryQueryResult {
        entries,
        years,
        full_days,
        half_days,
        total_payed_cents,
        total_to_pay_cents,
        keywords,
    })
}

/// Distinct years with any tenant activity, unioned with the current year
/// so the UI always has a default, newest first.
async fn activity_years(db: &DatabaseConnection, tenant: &TenantContext) -> LedgerResult<Vec<i32>> {
    let days: Vec<NaiveDate> = WorkEntry::find()
        .filter(work_entry::Column::TenantId.eq(tenant.tenant_id))
        .select_only()
        .column(work_entry::Column::WorkedDay)
        .into_tuple()
        .all(db)
        .await?;
    let mut years: BTreeSet<i32> = days.into_iter().map(|d| d.year()).collect();
    years.insert(Utc::now().date_naive().year());
    Ok(years.into_iter().rev().collect())
}

fn validate(input: &NewWorkEntry) -> LedgerResult<()> {
    if input.salary_amount_cents < 0 {
        return Err(LedgerError::validation("salaryAmount cannot be negative"));
    }
    if input.extras_cents < 0 {
        return Err(LedgerError::validation("extras cannot be negative"));
    }
    let total = input.salary_amount_cents + input.extras_cents;
    if input.payed_amount_cents < 0 || input.payed_amount_cents > total {
        return Err(LedgerError::validation(
            "payedAmount must be between 0 and the entry total",
        ));
    }
    Ok(())
}

fn build_model(
    tenant: &TenantContext,
    input: NewWorkEntry,
    now: sea_orm::prelude::DateTimeWithTimeZone,
) -> work_entry::ActiveModel {
    let total = input.salary_amount_cents + input.extras_cents;
    work_entry::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant.tenant_id),
        employee_id: Set(input.employee_id),
        worked_day: Set(input.worked_day),
        work_type: Set(input.work_type),
        salary_amount_cents: Set(input.salary_amount_cents),
        extras_cents: Set(input.extras_cents),
        total_cents: Set(total),
        payed_amount_cents: Set(input.payed_amount_cents),
        is_paid: Set(input.payed_amount_cents >= total),
        notes: Set(input.notes),
        created_at: Set(now),
        updated_at: Set(now),
    }
}
