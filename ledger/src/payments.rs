use std::time::Duration;

use chrono::Utc;
use entity::{advance, work_entry};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::tenant::TenantContext;

/// Knobs for the allocation transaction. The duration scales with the
/// number of unpaid entries being settled, so the timeout is generous and
/// configurable rather than hardcoded.
#[derive(Clone, Debug)]
pub struct AllocationConfig {
    pub timeout: Duration,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PaymentRequest {
    pub employee_id: Uuid,
    pub amount_cents: i64,
    /// Settle a single entry instead of the whole unpaid backlog.
    pub target_entry_id: Option<Uuid>,
    pub note: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AllocationOutcome {
    pub updated_entries: Vec<work_entry::Model>,
    pub advance: advance::Model,
}

/// Apply one incoming payment across unpaid work entries, oldest first,
/// and record the matching advance, all inside a single transaction.
///
/// Entry updates carry an optimistic guard on the `payed_amount_cents`
/// value read within the transaction; losing a race against a concurrent
/// payment fails the whole call and rolls everything back.
#[instrument(
    name = "payroll.allocate",
    skip_all,
    fields(employee = %request.employee_id, amount_cents = request.amount_cents)
)]
pub async fn allocate(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    request: PaymentRequest,
    config: &AllocationConfig,
) -> LedgerResult<AllocationOutcome> {
    if request.amount_cents <= 0 {
        return Err(LedgerError::validation("payment amount must be positive"));
    }
    match tokio::time::timeout(config.timeout, run_allocation(db, tenant, request)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(LedgerError::Storage(DbErr::Custom(
            "payment allocation timed out".into(),
        ))),
    }
}

async fn run_allocation(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    request: PaymentRequest,
) -> LedgerResult<AllocationOutcome> {
    let txn = db.begin().await?;

    let mut target = work_entry::Entity::find()
        .filter(work_entry::Column::TenantId.eq(tenant.tenant_id))
        .filter(work_entry::Column::EmployeeId.eq(request.employee_id))
        .filter(work_entry::Column::IsPaid.eq(false));
    if let Some(entry_id) = request.target_entry_id {
        target = target.filter(work_entry::Column::Id.eq(entry_id));
    }
    // FIFO: oldest day first; same-day ties resolve by creation order.
    let entries = target
        .order_by_asc(work_entry::Column::WorkedDay)
        .order_by_asc(work_entry::Column::CreatedAt)
        .order_by_asc(work_entry::Column::Id)
        .all(&txn)
        .await?;
    if entries.is_empty() {
        return Err(LedgerError::NotFound("unpaid work entries"));
    }

    let outstanding: i64 = entries
        .iter()
        .map(|e| (e.total_cents - e.payed_amount_cents).max(0))
        .sum();
    if request.amount_cents > outstanding {
        return Err(LedgerError::Overpayment {
            requested_cents: request.amount_cents,
            outstanding_cents: outstanding,
        });
    }

    let stamp: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    let mut remaining = request.amount_cents;
    let mut updated = Vec::new();
    for mut entry in entries {
        if remaining == 0 {
            break;
        }
        let open = (entry.total_cents - entry.payed_amount_cents).max(0);
        if open == 0 {
            continue;
        }
        let alloc = remaining.min(open);
        let new_payed = entry.payed_amount_cents + alloc;
        let new_is_paid = new_payed >= entry.total_cents;
        let result = work_entry::Entity::update_many()
            .col_expr(work_entry::Column::PayedAmountCents, Expr::value(new_payed))
            .col_expr(work_entry::Column::IsPaid, Expr::value(new_is_paid))
            .col_expr(work_entry::Column::UpdatedAt, Expr::value(stamp))
            .filter(work_entry::Column::Id.eq(entry.id))
            .filter(work_entry::Column::PayedAmountCents.eq(entry.payed_amount_cents))
            .exec(&txn)
            .await?;
        if result.rows_affected != 1 {
            return Err(LedgerError::Storage(DbErr::Custom(
                "work entry changed by a concurrent payment".into(),
            )));
        }
        remaining -= alloc;
        entry.payed_amount_cents = new_payed;
        entry.is_paid = new_is_paid;
        entry.updated_at = stamp;
        updated.push(entry);
    }

    let notes = request
        .note
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| describe_targets(&updated));
    let advance = advance::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant.tenant_id),
        employee_id: Set(request.employee_id),
        amount_cents: Set(request.amount_cents),
        date: Set(stamp),
        notes: Set(Some(notes)),
        created_at: Set(stamp),
        updated_at: Set(stamp),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(AllocationOutcome {
        updated_entries: updated,
        advance,
    })
}

fn describe_targets(entries: &[work_entry::Model]) -> String {
    match entries {
        [single] => format!("Payment for {}", single.worked_day.format("%d/%m/%Y")),
        _ => "Payment for multiple entries".to_string(),
    }
}
