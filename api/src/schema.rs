use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, Enum, Error, ErrorExtensions, ID, InputObject, Object, Schema,
    SimpleObject,
};
use chrono::{DateTime, NaiveDate, Utc};
use entity::{advance, employee, work_entry};
use ledger::advances::{AdvanceUpdate, NewAdvance};
use ledger::employees::{
    EmployeeDetail, EmployeeStats, EmployeeUpdate, EmployeeWithStats, NewEmployee,
};
use ledger::pagination::{PageInfo, PageRequest};
use ledger::payments::{AllocationConfig, PaymentRequest};
use ledger::reports::{self, ChartPoint, GroupBy, ReportBucket};
use ledger::work_entries::{self, NewWorkEntry, WorkEntryFilter};
use ledger::{LedgerError, TenantContext};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub struct AppSchema(pub SchemaType);

pub fn build_schema(db: Arc<DatabaseConnection>, allocation: AllocationConfig) -> AppSchema {
    let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .data(allocation)
        .finish();
    AppSchema(schema)
}

pub struct QueryRoot;
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    async fn payroll(&self) -> PayrollQuery {
        PayrollQuery
    }
}

#[Object]
impl MutationRoot {
    async fn payroll(&self) -> PayrollMutation {
        PayrollMutation
    }
}

#[derive(Default)]
pub struct PayrollQuery;

#[derive(Default)]
pub struct PayrollMutation;

#[Object]
impl PayrollQuery {
    async fn employees(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
        #[graphql(name = "isActive")] is_active: Option<bool>,
        page: Option<PageInput>,
    ) -> async_graphql::Result<EmployeePage> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let page = page_request(page)?;
        let result = ledger::employees::list(db.as_ref(), &tenant, search.as_deref(), is_active, page)
            .await
            .map_err(ledger_error)?;
        Ok(EmployeePage {
            items: result.items.into_iter().map(Into::into).collect(),
            page_info: result.page_info.into(),
        })
    }

    async fn employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        #[graphql(name = "historyPage")] history_page: Option<PageInput>,
        #[graphql(name = "advancesPage")] advances_page: Option<PageInput>,
    ) -> async_graphql::Result<EmployeeDetailNode> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let id = parse_uuid(&id)?;
        let history_page = page_request(history_page)?;
        let advances_page = page_request(advances_page)?;
        let detail =
            ledger::employees::get(db.as_ref(), &tenant, id, history_page, advances_page)
                .await
                .map_err(ledger_error)?;
        Ok(detail.into())
    }

    async fn work_entries(
        &self,
        ctx: &Context<'_>,
        filter: Option<WorkEntryFilterInput>,
        page: Option<PageInput>,
    ) -> async_graphql::Result<WorkEntriesPayload> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let filter = filter.map(WorkEntryFilterInput::into_filter).transpose()?;
        let page = page_request(page)?;
        let result = work_entries::query(db.as_ref(), &tenant, filter.unwrap_or_default())
            .await
            .map_err(ledger_error)?;

        let total = result.entries.len() as u64;
        let start = (page.offset() as usize).min(result.entries.len());
        let end = (start + page.limit() as usize).min(result.entries.len());
        Ok(WorkEntriesPayload {
            items: result.entries[start..end]
                .iter()
                .cloned()
                .map(Into::into)
                .collect(),
            page_info: PageInfo::new(&page, total).into(),
            years: result.years,
            full_days: result.full_days,
            half_days: result.half_days,
            total_payed_cents: result.total_payed_cents,
            total_to_pay_cents: result.total_to_pay_cents,
            keywords: result.keywords,
        })
    }

    async fn advances(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "employeeId")] employee_id: ID,
        page: Option<PageInput>,
    ) -> async_graphql::Result<AdvancePage> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let employee_id = parse_uuid(&employee_id)?;
        let page = page_request(page)?;
        let result = ledger::advances::list(db.as_ref(), &tenant, employee_id, page)
            .await
            .map_err(ledger_error)?;
        Ok(AdvancePage {
            items: result.items.into_iter().map(Into::into).collect(),
            page_info: result.page_info.into(),
        })
    }

    async fn report(
        &self,
        ctx: &Context<'_>,
        filter: Option<WorkEntryFilterInput>,
        #[graphql(name = "groupBy")] group_by: ReportGroupBy,
        page: Option<PageInput>,
    ) -> async_graphql::Result<ReportPayload> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let filter = filter.map(WorkEntryFilterInput::into_filter).transpose()?;
        let page = page_request(page)?;
        let output = reports::aggregate(
            db.as_ref(),
            &tenant,
            filter.unwrap_or_default(),
            group_by.into(),
            page,
        )
        .await
        .map_err(ledger_error)?;
        Ok(ReportPayload {
            items: output.buckets.items.into_iter().map(Into::into).collect(),
            page_info: output.buckets.page_info.into(),
            chart: output.chart.into_iter().map(Into::into).collect(),
        })
    }
}

#[Object]
impl PayrollMutation {
    #[graphql(name = "createEmployee")]
    async fn create_employee(
        &self,
        ctx: &Context<'_>,
        input: NewEmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let model = ledger::employees::create(
            db.as_ref(),
            &tenant,
            NewEmployee {
                name: input.name,
                daily_rate_cents: input.daily_rate_cents,
                half_day_rate_cents: input.half_day_rate_cents,
            },
        )
        .await
        .map_err(ledger_error)?;
        Ok(model.into())
    }

    #[graphql(name = "updateEmployee")]
    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        input: UpdateEmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let id = parse_uuid(&input.id)?;
        let model = ledger::employees::update(
            db.as_ref(),
            &tenant,
            id,
            EmployeeUpdate {
                name: input.name,
                daily_rate_cents: input.daily_rate_cents,
                half_day_rate_cents: input.half_day_rate_cents,
            },
        )
        .await
        .map_err(ledger_error)?;
        Ok(model.into())
    }

    #[graphql(name = "toggleEmployeeActive")]
    async fn toggle_employee_active(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<EmployeeNode> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let id = parse_uuid(&id)?;
        let model = ledger::employees::toggle_active(db.as_ref(), &tenant, id)
            .await
            .map_err(ledger_error)?;
        Ok(model.into())
    }

    #[graphql(name = "deleteEmployee")]
    async fn delete_employee(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let id = parse_uuid(&id)?;
        ledger::employees::delete(db.as_ref(), &tenant, id)
            .await
            .map_err(ledger_error)?;
        Ok(true)
    }

    #[graphql(name = "createWorkEntry")]
    async fn create_work_entry(
        &self,
        ctx: &Context<'_>,
        input: NewWorkEntryInput,
    ) -> async_graphql::Result<WorkEntryNode> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let entry = input.into_new_entry()?;
        let model = work_entries::create(db.as_ref(), &tenant, entry)
            .await
            .map_err(ledger_error)?;
        Ok(model.into())
    }

    #[graphql(name = "createWorkEntries")]
    async fn create_work_entries(
        &self,
        ctx: &Context<'_>,
        inputs: Vec<NewWorkEntryInput>,
    ) -> async_graphql::Result<Vec<WorkEntryNode>> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let entries = inputs
            .into_iter()
            .map(NewWorkEntryInput::into_new_entry)
            .collect::<async_graphql::Result<Vec<_>>>()?;
        let models = work_entries::create_batch(db.as_ref(), &tenant, entries)
            .await
            .map_err(ledger_error)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    #[graphql(name = "deleteWorkEntry")]
    async fn delete_work_entry(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let id = parse_uuid(&id)?;
        work_entries::delete(db.as_ref(), &tenant, id)
            .await
            .map_err(ledger_error)?;
        Ok(true)
    }

    #[graphql(name = "createAdvance")]
    async fn create_advance(
        &self,
        ctx: &Context<'_>,
        input: NewAdvanceInput,
    ) -> async_graphql::Result<AdvanceNode> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let employee_id = parse_uuid(&input.employee_id)?;
        let model = ledger::advances::create(
            db.as_ref(),
            &tenant,
            NewAdvance {
                employee_id,
                amount_cents: input.amount_cents,
                date: input.date.map(Into::into),
                notes: input.notes,
            },
        )
        .await
        .map_err(ledger_error)?;
        Ok(model.into())
    }

    #[graphql(name = "updateAdvance")]
    async fn update_advance(
        &self,
        ctx: &Context<'_>,
        input: UpdateAdvanceInput,
    ) -> async_graphql::Result<AdvanceNode> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let id = parse_uuid(&input.id)?;
        let model = ledger::advances::update(
            db.as_ref(),
            &tenant,
            id,
            AdvanceUpdate {
                amount_cents: input.amount_cents,
                date: input.date.map(Into::into),
                notes: input.notes,
            },
        )
        .await
        .map_err(ledger_error)?;
        Ok(model.into())
    }

    #[graphql(name = "deleteAdvance")]
    async fn delete_advance(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let id = parse_uuid(&id)?;
        ledger::advances::delete(db.as_ref(), &tenant, id)
            .await
            .map_err(ledger_error)?;
        Ok(true)
    }

    #[graphql(name = "payEmployee")]
    async fn pay_employee(
        &self,
        ctx: &Context<'_>,
        input: PayInput,
    ) -> async_graphql::Result<PaymentPayload> {
        let tenant = tenant(ctx)?;
        let db = database(ctx)?;
        let allocation = allocation_config(ctx)?;
        let employee_id = parse_uuid(&input.employee_id)?;
        let target_entry_id = input
            .work_entry_id
            .as_ref()
            .map(parse_uuid)
            .transpose()?;
        let outcome = ledger::payments::allocate(
            db.as_ref(),
            &tenant,
            PaymentRequest {
                employee_id,
                amount_cents: input.amount_cents,
                target_entry_id,
                note: input.note,
            },
            &allocation,
        )
        .await
        .map_err(ledger_error)?;
        Ok(PaymentPayload {
            advance: outcome.advance.into(),
            updated_entries: outcome
                .updated_entries
                .into_iter()
                .map(Into::into)
                .collect(),
        })
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "WorkType")]
pub enum WorkTypeValue {
    #[graphql(name = "FULL_DAY")]
    FullDay,
    #[graphql(name = "HALF_DAY")]
    HalfDay,
}

impl From<WorkTypeValue> for work_entry::WorkType {
    fn from(value: WorkTypeValue) -> Self {
        match value {
            WorkTypeValue::FullDay => work_entry::WorkType::FullDay,
            WorkTypeValue::HalfDay => work_entry::WorkType::HalfDay,
        }
    }
}

impl From<work_entry::WorkType> for WorkTypeValue {
    fn from(value: work_entry::WorkType) -> Self {
        match value {
            work_entry::WorkType::FullDay => WorkTypeValue::FullDay,
            work_entry::WorkType::HalfDay => WorkTypeValue::HalfDay,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "GroupBy")]
pub enum ReportGroupBy {
    #[graphql(name = "DAY")]
    Day,
    #[graphql(name = "WEEK")]
    Week,
    #[graphql(name = "MONTH")]
    Month,
    #[graphql(name = "YEAR")]
    Year,
}

impl From<ReportGroupBy> for GroupBy {
    fn from(value: ReportGroupBy) -> Self {
        match value {
            ReportGroupBy::Day => GroupBy::Day,
            ReportGroupBy::Week => GroupBy::Week,
            ReportGroupBy::Month => GroupBy::Month,
            ReportGroupBy::Year => GroupBy::Year,
        }
    }
}

#[derive(InputObject, Clone, Copy, Default)]
pub struct PageInput {
    pub page: Option<i32>,
    #[graphql(name = "pageSize")]
    pub page_size: Option<i32>,
}

#[derive(InputObject, Clone)]
pub struct NewEmployeeInput {
    pub name: String,
    #[graphql(name = "dailyRateCents")]
    pub daily_rate_cents: i64,
    #[graphql(name = "halfDayRateCents")]
    pub half_day_rate_cents: i64,
}

#[derive(InputObject, Clone)]
pub struct UpdateEmployeeInput {
    pub id: ID,
    pub name: String,
    #[graphql(name = "dailyRateCents")]
    pub daily_rate_cents: i64,
    #[graphql(name = "halfDayRateCents")]
    pub half_day_rate_cents: i64,
}

#[derive(InputObject, Clone)]
pub struct NewWorkEntryInput {
    #[graphql(name = "employeeId")]
    pub employee_id: ID,
    #[graphql(name = "workedDay")]
    pub worked_day: NaiveDate,
    #[graphql(name = "workType")]
    pub work_type: WorkTypeValue,
    #[graphql(name = "salaryAmountCents")]
    pub salary_amount_cents: i64,
    #[graphql(name = "extrasCents", default)]
    pub extras_cents: i64,
    #[graphql(name = "payedAmountCents", default)]
    pub payed_amount_cents: i64,
    pub notes: Option<String>,
}

impl NewWorkEntryInput {
    fn into_new_entry(self) -> async_graphql::Result<NewWorkEntry> {
        let employee_id = parse_uuid(&self.employee_id)?;
        Ok(NewWorkEntry {
            employee_id,
            worked_day: self.worked_day,
            work_type: self.work_type.into(),
            salary_amount_cents: self.salary_amount_cents,
            extras_cents: self.extras_cents,
            payed_amount_cents: self.payed_amount_cents,
            notes: self.notes,
        })
    }
}

#[derive(InputObject, Clone, Default)]
pub struct WorkEntryFilterInput {
    #[graphql(name = "employeeId")]
    pub employee_id: Option<ID>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[graphql(name = "isPaid")]
    pub is_paid: Option<bool>,
    #[graphql(name = "workType")]
    pub work_type: Option<WorkTypeValue>,
    #[graphql(name = "notesKeyword")]
    pub notes_keyword: Option<String>,
}

impl WorkEntryFilterInput {
    fn into_filter(self) -> async_graphql::Result<WorkEntryFilter> {
        let employee_id = self.employee_id.as_ref().map(parse_uuid).transpose()?;
        Ok(WorkEntryFilter {
            employee_id,
            from: self.from,
            to: self.to,
            is_paid: self.is_paid,
            work_type: self.work_type.map(Into::into),
            notes_keyword: self.notes_keyword,
        })
    }
}

#[derive(InputObject, Clone)]
pub struct NewAdvanceInput {
    #[graphql(name = "employeeId")]
    pub employee_id: ID,
    #[graphql(name = "amountCents")]
    pub amount_cents: i64,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(InputObject, Clone)]
pub struct UpdateAdvanceInput {
    pub id: ID,
    #[graphql(name = "amountCents")]
    pub amount_cents: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(InputObject, Clone)]
pub struct PayInput {
    #[graphql(name = "employeeId")]
    pub employee_id: ID,
    #[graphql(name = "amountCents")]
    pub amount_cents: i64,
    #[graphql(name = "workEntryId")]
    pub work_entry_id: Option<ID>,
    pub note: Option<String>,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub id: ID,
    pub name: String,
    #[graphql(name = "dailyRateCents")]
    pub daily_rate_cents: i64,
    #[graphql(name = "halfDayRateCents")]
    pub half_day_rate_cents: i64,
    #[graphql(name = "isActive")]
    pub is_active: bool,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<employee::Model> for EmployeeNode {
    fn from(model: employee::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            name: model.name,
            daily_rate_cents: model.daily_rate_cents,
            half_day_rate_cents: model.half_day_rate_cents,
            is_active: model.is_active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "EmployeeStats")]
pub struct EmployeeStatsNode {
    #[graphql(name = "fullDays")]
    pub full_days: u64,
    #[graphql(name = "halfDays")]
    pub half_days: u64,
    #[graphql(name = "extrasCents")]
    pub extras_cents: i64,
    #[graphql(name = "toPayCents")]
    pub to_pay_cents: i64,
    #[graphql(name = "advancesCents")]
    pub advances_cents: i64,
}

impl From<EmployeeStats> for EmployeeStatsNode {
    fn from(stats: EmployeeStats) -> Self {
        Self {
            full_days: stats.full_days,
            half_days: stats.half_days,
            extras_cents: stats.extras_cents,
            to_pay_cents: stats.to_pay_cents,
            advances_cents: stats.advances_cents,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "EmployeeWithStats")]
pub struct EmployeeWithStatsNode {
    pub employee: EmployeeNode,
    pub stats: EmployeeStatsNode,
}

impl From<EmployeeWithStats> for EmployeeWithStatsNode {
    fn from(value: EmployeeWithStats) -> Self {
        Self {
            employee: value.employee.into(),
            stats: value.stats.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "EmployeeDetail")]
pub struct EmployeeDetailNode {
    pub employee: EmployeeNode,
    pub stats: EmployeeStatsNode,
    #[graphql(name = "workHistory")]
    pub work_history: WorkEntryPage,
    pub advances: AdvancePage,
}

impl From<EmployeeDetail> for EmployeeDetailNode {
    fn from(detail: EmployeeDetail) -> Self {
        Self {
            employee: detail.employee.into(),
            stats: detail.stats.into(),
            work_history: WorkEntryPage {
                items: detail.work_history.items.into_iter().map(Into::into).collect(),
                page_info: detail.work_history.page_info.into(),
            },
            advances: AdvancePage {
                items: detail.advances.items.into_iter().map(Into::into).collect(),
                page_info: detail.advances.page_info.into(),
            },
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "WorkEntry")]
pub struct WorkEntryNode {
    pub id: ID,
    #[graphql(name = "employeeId")]
    pub employee_id: ID,
    #[graphql(name = "workedDay")]
    pub worked_day: NaiveDate,
    #[graphql(name = "workType")]
    pub work_type: WorkTypeValue,
    #[graphql(name = "salaryAmountCents")]
    pub salary_amount_cents: i64,
    #[graphql(name = "extrasCents")]
    pub extras_cents: i64,
    #[graphql(name = "totalCents")]
    pub total_cents: i64,
    #[graphql(name = "payedAmountCents")]
    pub payed_amount_cents: i64,
    #[graphql(name = "isPaid")]
    pub is_paid: bool,
    pub notes: Option<String>,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<work_entry::Model> for WorkEntryNode {
    fn from(model: work_entry::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            employee_id: ID::from(model.employee_id.to_string()),
            worked_day: model.worked_day,
            work_type: model.work_type.into(),
            salary_amount_cents: model.salary_amount_cents,
            extras_cents: model.extras_cents,
            total_cents: model.total_cents,
            payed_amount_cents: model.payed_amount_cents,
            is_paid: model.is_paid,
            notes: model.notes,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Advance")]
pub struct AdvanceNode {
    pub id: ID,
    #[graphql(name = "employeeId")]
    pub employee_id: ID,
    #[graphql(name = "amountCents")]
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<advance::Model> for AdvanceNode {
    fn from(model: advance::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            employee_id: ID::from(model.employee_id.to_string()),
            amount_cents: model.amount_cents,
            date: model.date.into(),
            notes: model.notes,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PageInfo")]
pub struct PageInfoNode {
    pub page: u64,
    #[graphql(name = "pageSize")]
    pub page_size: u64,
    #[graphql(name = "totalItems")]
    pub total_items: u64,
    #[graphql(name = "totalPages")]
    pub total_pages: u64,
}

impl From<PageInfo> for PageInfoNode {
    fn from(info: PageInfo) -> Self {
        Self {
            page: info.page,
            page_size: info.page_size,
            total_items: info.total_items,
            total_pages: info.total_pages,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "EmployeePage")]
pub struct EmployeePage {
    pub items: Vec<EmployeeWithStatsNode>,
    #[graphql(name = "pageInfo")]
    pub page_info: PageInfoNode,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "WorkEntryPage")]
pub struct WorkEntryPage {
    pub items: Vec<WorkEntryNode>,
    #[graphql(name = "pageInfo")]
    pub page_info: PageInfoNode,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "AdvancePage")]
pub struct AdvancePage {
    pub items: Vec<AdvanceNode>,
    #[graphql(name = "pageInfo")]
    pub page_info: PageInfoNode,
}

/// Filtered entries plus the aggregate figures computed over the whole
/// filtered set, not just the returned page.
#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "WorkEntriesPayload")]
pub struct WorkEntriesPayload {
    pub items: Vec<WorkEntryNode>,
    #[graphql(name = "pageInfo")]
    pub page_info: PageInfoNode,
    pub years: Vec<i32>,
    #[graphql(name = "fullDays")]
    pub full_days: u64,
    #[graphql(name = "halfDays")]
    pub half_days: u64,
    #[graphql(name = "totalPayedCents")]
    pub total_payed_cents: i64,
    #[graphql(name = "totalToPayCents")]
    pub total_to_pay_cents: i64,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "ReportBucket")]
pub struct ReportBucketNode {
    #[graphql(name = "employeeId")]
    pub employee_id: ID,
    #[graphql(name = "employeeName")]
    pub employee_name: String,
    #[graphql(name = "periodLabel")]
    pub period_label: String,
    #[graphql(name = "sortIndex")]
    pub sort_index: i64,
    #[graphql(name = "fullDays")]
    pub full_days: u64,
    #[graphql(name = "halfDays")]
    pub half_days: u64,
    #[graphql(name = "salaryCents")]
    pub salary_cents: i64,
    #[graphql(name = "extrasCents")]
    pub extras_cents: i64,
    #[graphql(name = "totalCents")]
    pub total_cents: i64,
    #[graphql(name = "payedCents")]
    pub payed_cents: i64,
    #[graphql(name = "toPayCents")]
    pub to_pay_cents: i64,
    #[graphql(name = "isPaid")]
    pub is_paid: bool,
    #[graphql(name = "entryIds")]
    pub entry_ids: Vec<ID>,
}

impl From<ReportBucket> for ReportBucketNode {
    fn from(bucket: ReportBucket) -> Self {
        Self {
            employee_id: ID::from(bucket.employee_id.to_string()),
            employee_name: bucket.employee_name,
            period_label: bucket.period_label,
            sort_index: bucket.sort_index,
            full_days: bucket.full_days,
            half_days: bucket.half_days,
            salary_cents: bucket.salary_cents,
            extras_cents: bucket.extras_cents,
            total_cents: bucket.total_cents,
            payed_cents: bucket.payed_cents,
            to_pay_cents: bucket.to_pay_cents,
            is_paid: bucket.is_paid,
            entry_ids: bucket
                .entry_ids
                .into_iter()
                .map(|id| ID::from(id.to_string()))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "ChartPoint")]
pub struct ChartPointNode {
    pub label: String,
    #[graphql(name = "sortIndex")]
    pub sort_index: Option<i64>,
    #[graphql(name = "totalCents")]
    pub total_cents: i64,
    #[graphql(name = "payedCents")]
    pub payed_cents: i64,
}

impl From<ChartPoint> for ChartPointNode {
    fn from(point: ChartPoint) -> Self {
        Self {
            label: point.label,
            sort_index: point.sort_index,
            total_cents: point.total_cents,
            payed_cents: point.payed_cents,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "ReportPayload")]
pub struct ReportPayload {
    pub items: Vec<ReportBucketNode>,
    #[graphql(name = "pageInfo")]
    pub page_info: PageInfoNode,
    pub chart: Vec<ChartPointNode>,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PaymentPayload")]
pub struct PaymentPayload {
    pub advance: AdvanceNode,
    #[graphql(name = "updatedEntries")]
    pub updated_entries: Vec<WorkEntryNode>,
}

fn database(ctx: &Context<'_>) -> async_graphql::Result<Arc<DatabaseConnection>> {
    ctx.data::<Arc<DatabaseConnection>>()
        .cloned()
        .map_err(|_| error_with_code("INTERNAL", "Missing database connection"))
}

fn allocation_config(ctx: &Context<'_>) -> async_graphql::Result<AllocationConfig> {
    ctx.data::<AllocationConfig>()
        .cloned()
        .map_err(|_| error_with_code("INTERNAL", "Missing allocation config"))
}

fn tenant(ctx: &Context<'_>) -> async_graphql::Result<TenantContext> {
    ctx.data::<TenantContext>()
        .cloned()
        .map_err(|_| error_with_code("UNAUTHENTICATED", "Missing tenant"))
}

fn parse_uuid(id: &ID) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str()).map_err(|_| error_with_code("BAD_REQUEST", "Invalid ID"))
}

fn page_request(input: Option<PageInput>) -> async_graphql::Result<PageRequest> {
    let Some(input) = input else {
        return Ok(PageRequest::default());
    };
    let default = PageRequest::default();
    let page = input.page.map(|p| p.max(0) as u64).unwrap_or(default.page());
    let size = input
        .page_size
        .map(|s| s.max(0) as u64)
        .unwrap_or(default.page_size());
    PageRequest::new(page, size).map_err(ledger_error)
}

fn error_with_code(code: &'static str, message: impl Into<String>) -> Error {
    Error::new(message).extend_with(|_, e| e.set("code", code))
}

fn ledger_error(err: LedgerError) -> Error {
    match err {
        LedgerError::Validation(message) => error_with_code("VALIDATION", message),
        LedgerError::Unauthorized => error_with_code("UNAUTHENTICATED", "Not authorized"),
        LedgerError::NotFound(what) => {
            error_with_code("NOT_FOUND", format!("No matching {}", what))
        }
        LedgerError::DuplicateName => error_with_code(
            "DUPLICATE_NAME",
            "An employee with this name already exists",
        ),
        LedgerError::Overpayment {
            requested_cents,
            outstanding_cents,
        } => Error::new(format!(
            "Payment of {} cents exceeds the outstanding balance of {} cents",
            requested_cents, outstanding_cents
        ))
        .extend_with(|_, e| {
            e.set("code", "OVERPAYMENT");
            e.set("requestedCents", requested_cents);
            e.set("outstandingCents", outstanding_cents);
        }),
        LedgerError::Storage(err) => {
            tracing::error!(error = %err, "storage failure");
            error_with_code("INTERNAL", "Internal storage error")
        }
    }
}
