mod common;

use chrono::{Datelike, Utc};
use common::{day, has_error_code, setup};
use entity::work_entry;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

const ENTRIES_QUERY: &str = r#"
    query Entries($filter: WorkEntryFilterInput, $page: PageInput) {
        payroll {
            workEntries(filter: $filter, page: $page) {
                items { id workedDay totalCents payedAmountCents isPaid notes }
                pageInfo { totalItems totalPages }
                years
                fullDays
                halfDays
                totalPayedCents
                totalToPayCents
                keywords
            }
        }
    }
"#;

#[tokio::test]
async fn create_derives_total_and_paid_flag() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;

    let mutation = r#"
        mutation Create($input: NewWorkEntryInput!) {
            payroll {
                createWorkEntry(input: $input) {
                    totalCents isPaid payedAmountCents
                }
            }
        }
    "#;
    let resp = env
        .exec(
            mutation,
            json!({ "input": {
                "employeeId": anna.id.to_string(),
                "workedDay": "2024-03-07",
                "workType": "FULL_DAY",
                "salaryAmountCents": 10_000,
                "extrasCents": 2_000,
                "payedAmountCents": 12_000,
            } }),
        )
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);

    let entry = resp.data.into_json().unwrap()["payroll"]["createWorkEntry"].clone();
    assert_eq!(entry["totalCents"].as_i64().unwrap(), 12_000);
    assert!(entry["isPaid"].as_bool().unwrap());
}

#[tokio::test]
async fn create_rejects_payed_amount_above_total() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;

    let mutation = r#"
        mutation Create($input: NewWorkEntryInput!) {
            payroll { createWorkEntry(input: $input) { id } }
        }
    "#;
    let resp = env
        .exec(
            mutation,
            json!({ "input": {
                "employeeId": anna.id.to_string(),
                "workedDay": "2024-03-07",
                "workType": "FULL_DAY",
                "salaryAmountCents": 10_000,
                "payedAmountCents": 10_001,
            } }),
        )
        .await;
    assert!(has_error_code(&resp.errors, "VALIDATION"));
}

#[tokio::test]
async fn batch_creation_is_all_or_nothing() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;
    let other = ledger::TenantContext::new(uuid::Uuid::new_v4());
    let foreign = env.seed_employee_for(other, "Bruno").await;

    let mutation = r#"
        mutation CreateMany($inputs: [NewWorkEntryInput!]!) {
            payroll { createWorkEntries(inputs: $inputs) { id } }
        }
    "#;
    let entry = |id: String| {
        json!({
            "employeeId": id,
            "workedDay": "2024-03-07",
            "workType": "FULL_DAY",
            "salaryAmountCents": 10_000,
        })
    };
    let resp = env
        .exec(
            mutation,
            json!({ "inputs": [entry(anna.id.to_string()), entry(foreign.id.to_string())] }),
        )
        .await;
    assert!(has_error_code(&resp.errors, "NOT_FOUND"));

    let count = work_entry::Entity::find()
        .filter(work_entry::Column::TenantId.eq(env.tenant.tenant_id))
        .count(env.db.as_ref())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn query_reports_keywords_from_matching_notes() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;
    env.seed_entry_with(
        env.tenant,
        anna.id,
        day(2024, 3, 1),
        10_000,
        0,
        Some("Raccolta pomodori, extra ore"),
    )
    .await;
    env.seed_entry_with(
        env.tenant,
        anna.id,
        day(2024, 3, 2),
        10_000,
        0,
        Some("Lavoro straordinario extra"),
    )
    .await;

    let resp = env.exec(ENTRIES_QUERY, json!({})).await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);

    let payload = resp.data.into_json().unwrap()["payroll"]["workEntries"].clone();
    let keywords: Vec<String> = payload["keywords"]
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k.as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        keywords,
        vec!["extra", "lavoro", "ore", "pomodori", "raccolta", "straordinario"]
    );
}

#[tokio::test]
async fn query_totals_and_years() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;
    env.seed_entry(anna.id, day(2023, 8, 20), 10_000, 10_000).await;
    env.seed_entry(anna.id, day(2024, 3, 1), 10_000, 4_000).await;

    let resp = env.exec(ENTRIES_QUERY, json!({})).await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);

    let payload = resp.data.into_json().unwrap()["payroll"]["workEntries"].clone();
    assert_eq!(payload["fullDays"].as_u64().unwrap(), 2);
    assert_eq!(payload["halfDays"].as_u64().unwrap(), 0);
    assert_eq!(payload["totalPayedCents"].as_i64().unwrap(), 14_000);
    assert_eq!(payload["totalToPayCents"].as_i64().unwrap(), 6_000);

    let years: Vec<i64> = payload["years"]
        .as_array()
        .unwrap()
        .iter()
        .map(|y| y.as_i64().unwrap())
        .collect();
    let current = i64::from(Utc::now().date_naive().year());
    assert!(years.contains(&2023));
    assert!(years.contains(&2024));
    assert!(years.contains(&current));
    let mut sorted = years.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(years, sorted);
}

#[tokio::test]
async fn notes_keyword_filter_is_case_insensitive() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;
    env.seed_entry_with(
        env.tenant,
        anna.id,
        day(2024, 3, 1),
        10_000,
        0,
        Some("Raccolta POMODORI"),
    )
    .await;
    env.seed_entry_with(env.tenant, anna.id, day(2024, 3, 2), 10_000, 0, Some("Potatura"))
        .await;

    let resp = env
        .exec(
            ENTRIES_QUERY,
            json!({ "filter": { "notesKeyword": "pomodori" } }),
        )
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);

    let items = resp.data.into_json().unwrap()["payroll"]["workEntries"]["items"]
        .as_array()
        .unwrap()
        .to_vec();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["notes"].as_str().unwrap(), "Raccolta POMODORI");
}

#[tokio::test]
async fn entries_are_paginated_newest_first() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;
    for d in 1..=5 {
        env.seed_entry(anna.id, day(2024, 3, d), 10_000, 0).await;
    }

    let resp = env
        .exec(ENTRIES_QUERY, json!({ "page": { "page": 1, "pageSize": 2 } }))
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);

    let payload = resp.data.into_json().unwrap()["payroll"]["workEntries"].clone();
    assert_eq!(payload["pageInfo"]["totalItems"].as_u64().unwrap(), 5);
    assert_eq!(payload["pageInfo"]["totalPages"].as_u64().unwrap(), 3);
    let items = payload["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["workedDay"].as_str().unwrap(), "2024-03-05");
    // Totals still cover the whole filtered set, not just this page.
    assert_eq!(payload["fullDays"].as_u64().unwrap(), 5);
}

#[tokio::test]
async fn other_tenants_entries_are_invisible() {
    let env = setup().await;
    let other = ledger::TenantContext::new(uuid::Uuid::new_v4());
    let foreign = env.seed_employee_for(other, "Bruno").await;
    env.seed_entry_with(other, foreign.id, day(2024, 3, 1), 10_000, 0, None)
        .await;

    let resp = env.exec(ENTRIES_QUERY, json!({})).await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let items = resp.data.into_json().unwrap()["payroll"]["workEntries"]["items"]
        .as_array()
        .unwrap()
        .to_vec();
    assert!(items.is_empty());
}

#[tokio::test]
async fn missing_tenant_is_unauthenticated() {
    let env = setup().await;
    let resp = env.exec_anonymous(ENTRIES_QUERY, json!({})).await;
    assert!(has_error_code(&resp.errors, "UNAUTHENTICATED"));
}

#[tokio::test]
async fn delete_is_tenant_scoped() {
    let env = setup().await;
    let other = ledger::TenantContext::new(uuid::Uuid::new_v4());
    let foreign = env.seed_employee_for(other, "Bruno").await;
    let entry = env
        .seed_entry_with(other, foreign.id, day(2024, 3, 1), 10_000, 0, None)
        .await;

    let mutation = r#"
        mutation Delete($id: ID!) {
            payroll { deleteWorkEntry(id: $id) }
        }
    "#;
    let resp = env
        .exec(mutation, json!({ "id": entry.id.to_string() }))
        .await;
    assert!(has_error_code(&resp.errors, "NOT_FOUND"));

    let still_there = work_entry::Entity::find_by_id(entry.id)
        .one(env.db.as_ref())
        .await
        .unwrap();
    assert!(still_there.is_some());
}
