use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use entity::{employee, work_entry};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::error::LedgerResult;
use crate::pagination::{PageInfo, PageRequest, Paged};
use crate::tenant::TenantContext;
use crate::work_entries::{self, WorkEntryFilter};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GroupBy {
    Day,
    Week,
    Month,
    Year,
}

/// One (employee, period) aggregate. Buckets carry an explicit
/// `sort_index` (days since the common era of the period start) so that
/// ordering never depends on parsing the display label back apart.
#[derive(Clone, Debug)]
pub struct ReportBucket {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub period_start: NaiveDate,
    pub period_label: String,
    pub sort_index: i64,
    pub full_days: u64,
    pub half_days: u64,
    pub salary_cents: i64,
    pub extras_cents: i64,
    pub total_cents: i64,
    pub payed_cents: i64,
    pub to_pay_cents: i64,
    /// True only when every member entry is settled.
    pub is_paid: bool,
    pub entry_ids: Vec<Uuid>,
}

/// One point of the earnings trend chart: a period summed across all
/// employees. `sort_index` is absent only for points rebuilt from bare
/// labels by older clients.
#[derive(Clone, Debug)]
pub struct ChartPoint {
    pub label: String,
    pub sort_index: Option<i64>,
    pub total_cents: i64,
    pub payed_cents: i64,
}

#[derive(Clone, Debug)]
pub struct ReportOutput {
    pub buckets: Paged<ReportBucket>,
    pub chart: Vec<ChartPoint>,
}

/// Fetch, group and paginate in that order. Pagination applies to the
/// grouped buckets, not to the underlying rows, so `total_items` counts
/// buckets; the chart is built from the full bucket set before the page
/// is cut.
pub async fn aggregate(
    db: &DatabaseConnection,
    tenant: &TenantContext,
    filter: WorkEntryFilter,
    group_by: GroupBy,
    page: PageRequest,
) -> LedgerResult<ReportOutput> {
    let result = work_entries::query(db, tenant, filter).await?;

    let ids: Vec<Uuid> = result.entries.iter().map(|e| e.employee_id).collect();
    let names: HashMap<Uuid, String> = employee::Entity::find()
        .filter(employee::Column::TenantId.eq(tenant.tenant_id))
        .filter(employee::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();

    let buckets = group_entries(&result.entries, &names, group_by);
    let mut chart = chart_points(&buckets);
    sort_chart_points(&mut chart);

    let total = buckets.len() as u64;
    let start = (page.offset() as usize).min(buckets.len());
    let end = (start + page.limit() as usize).min(buckets.len());
    Ok(ReportOutput {
        buckets: Paged {
            items: buckets[start..end].to_vec(),
            page_info: PageInfo::new(&page, total),
        },
        chart,
    })
}

/// Fold entries into (employee, period) buckets, newest period first and
/// employees alphabetical within a period.
pub fn group_entries(
    entries: &[work_entry::Model],
    names: &HashMap<Uuid, String>,
    group_by: GroupBy,
) -> Vec<ReportBucket> {
    let mut buckets: HashMap<(Uuid, NaiveDate), ReportBucket> = HashMap::new();
    for entry in entries {
        let start = period_start(entry.worked_day, group_by);
        let bucket = buckets
            .entry((entry.employee_id, start))
            .or_insert_with(|| ReportBucket {
                employee_id: entry.employee_id,
                employee_name: names
                    .get(&entry.employee_id)
                    .cloned()
                    .unwrap_or_default(),
                period_start: start,
                period_label: label_for(group_by, start),
                sort_index: i64::from(start.num_days_from_ce()),
                full_days: 0,
                half_days: 0,
                salary_cents: 0,
                extras_cents: 0,
                total_cents: 0,
                payed_cents: 0,
                to_pay_cents: 0,
                is_paid: true,
                entry_ids: Vec::new(),
            });
        match entry.work_type {
            work_entry::WorkType::FullDay => bucket.full_days += 1,
            work_entry::WorkType::HalfDay => bucket.half_days += 1,
        }
        bucket.salary_cents += entry.salary_amount_cents;
        bucket.extras_cents += entry.extras_cents;
        bucket.total_cents += entry.total_cents;
        bucket.payed_cents += entry.payed_amount_cents;
        bucket.to_pay_cents += (entry.total_cents - entry.payed_amount_cents).max(0);
        bucket.is_paid &= entry.is_paid;
        bucket.entry_ids.push(entry.id);
    }

    let mut out: Vec<ReportBucket> = buckets.into_values().collect();
    out.sort_by(|a, b| {
        b.sort_index
            .cmp(&a.sort_index)
            .then_with(|| a.employee_name.cmp(&b.employee_name))
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
    out
}

/// Sum buckets across employees into one chart point per period.
pub fn chart_points(buckets: &[ReportBucket]) -> Vec<ChartPoint> {
    let mut by_period: HashMap<NaiveDate, ChartPoint> = HashMap::new();
    for bucket in buckets {
        let point = by_period
            .entry(bucket.period_start)
            .or_insert_with(|| ChartPoint {
                label: bucket.period_label.clone(),
                sort_index: Some(bucket.sort_index),
                total_cents: 0,
                payed_cents: 0,
            });
        point.total_cents += bucket.total_cents;
        point.payed_cents += bucket.payed_cents;
    }
    by_period.into_values().collect()
}

/// Chronological ordering for chart points. Prefers the explicit
/// `sort_index`; points without one (older clients send bare labels such
/// as "Week 9, 2024") fall back to a tolerant label parse, and anything
/// still ambiguous sorts lexicographically at the end.
pub fn sort_chart_points(points: &mut [ChartPoint]) {
    points.sort_by(|a, b| match (chart_key(a), chart_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.label.cmp(&b.label)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.label.cmp(&b.label),
    });
}

fn chart_key(point: &ChartPoint) -> Option<i64> {
    point.sort_index.or_else(|| parse_week_label(&point.label))
}

/// Recover an ordering key from a "Week N, Year" style label: the first
/// digit run is the week, the last four-digit run the year. Returns
/// `None` when either is missing.
fn parse_week_label(label: &str) -> Option<i64> {
    let runs: Vec<&str> = label
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .collect();
    let week: i64 = runs.first()?.parse().ok()?;
    let year: i64 = runs.iter().rev().find(|r| r.len() == 4)?.parse().ok()?;
    Some(year * 100 + week)
}

pub fn period_start(day: NaiveDate, group_by: GroupBy) -> NaiveDate {
    match group_by {
        GroupBy::Day => day,
        GroupBy::Week => day - Duration::days(i64::from(day.weekday().num_days_from_monday())),
        GroupBy::Month => day.with_day(1).unwrap_or(day),
        GroupBy::Year => NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day),
    }
}

pub fn label_for(group_by: GroupBy, start: NaiveDate) -> String {
    match group_by {
        GroupBy::Day => start.format("%d/%m/%Y").to_string(),
        GroupBy::Week => {
            let end = start + Duration::days(6);
            format!(
                "{} - {}",
                start.format("%d/%m/%Y"),
                end.format("%d/%m/%Y")
            )
        }
        GroupBy::Month => format!("{} {}", month_name(start.month()), start.year()),
        GroupBy::Year => start.year().to_string(),
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "gennaio",
        2 => "febbraio",
        3 => "marzo",
        4 => "aprile",
        5 => "maggio",
        6 => "giugno",
        7 => "luglio",
        8 => "agosto",
        9 => "settembre",
        10 => "ottobre",
        11 => "novembre",
        _ => "dicembre",
    }
}
