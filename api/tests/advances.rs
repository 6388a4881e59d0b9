mod common;

use common::{day, has_error_code, setup};
use entity::work_entry;
use sea_orm::EntityTrait;
use serde_json::json;

#[tokio::test]
async fn create_defaults_the_date_to_now() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;

    let mutation = r#"
        mutation Create($input: NewAdvanceInput!) {
            payroll { createAdvance(input: $input) { id amountCents date notes } }
        }
    "#;
    let resp = env
        .exec(
            mutation,
            json!({ "input": { "employeeId": anna.id.to_string(), "amountCents": 5_000, "notes": "anticipo" } }),
        )
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let created = resp.data.into_json().unwrap()["payroll"]["createAdvance"].clone();
    assert_eq!(created["amountCents"].as_i64().unwrap(), 5_000);
    assert_eq!(created["notes"].as_str().unwrap(), "anticipo");
    assert!(created["date"].as_str().is_some());
}

#[tokio::test]
async fn create_requires_a_positive_amount_and_owned_employee() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;

    let mutation = r#"
        mutation Create($input: NewAdvanceInput!) {
            payroll { createAdvance(input: $input) { id } }
        }
    "#;
    let resp = env
        .exec(
            mutation,
            json!({ "input": { "employeeId": anna.id.to_string(), "amountCents": 0 } }),
        )
        .await;
    assert!(has_error_code(&resp.errors, "VALIDATION"));

    let resp = env
        .exec(
            mutation,
            json!({ "input": { "employeeId": uuid::Uuid::new_v4().to_string(), "amountCents": 1_000 } }),
        )
        .await;
    assert!(has_error_code(&resp.errors, "NOT_FOUND"));
}

#[tokio::test]
async fn amount_edits_never_reallocate_entries() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;
    let entry = env.seed_entry(anna.id, day(2024, 3, 1), 10_000, 0).await;
    let advance = env.seed_advance(anna.id, 2_000).await;

    let mutation = r#"
        mutation Update($input: UpdateAdvanceInput!) {
            payroll { updateAdvance(input: $input) { amountCents notes } }
        }
    "#;
    let resp = env
        .exec(
            mutation,
            json!({ "input": { "id": advance.id.to_string(), "amountCents": 9_000, "notes": "corretto" } }),
        )
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let updated = resp.data.into_json().unwrap()["payroll"]["updateAdvance"].clone();
    assert_eq!(updated["amountCents"].as_i64().unwrap(), 9_000);
    assert_eq!(updated["notes"].as_str().unwrap(), "corretto");

    // The work entry is untouched; only payments move payed amounts.
    let entry = work_entry::Entity::find_by_id(entry.id)
        .one(env.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.payed_amount_cents, 0);
    assert!(!entry.is_paid);
}

#[tokio::test]
async fn delete_is_tenant_scoped() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;
    let advance = env.seed_advance(anna.id, 2_000).await;

    let mutation = r#"
        mutation Delete($id: ID!) {
            payroll { deleteAdvance(id: $id) }
        }
    "#;
    let other = ledger::TenantContext::new(uuid::Uuid::new_v4());
    let resp = env
        .exec_as(other, mutation, json!({ "id": advance.id.to_string() }))
        .await;
    assert!(has_error_code(&resp.errors, "NOT_FOUND"));

    let resp = env
        .exec(mutation, json!({ "id": advance.id.to_string() }))
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
}

#[tokio::test]
async fn list_returns_newest_first() {
    let env = setup().await;
    let anna = env.seed_employee("Anna").await;
    env.seed_advance(anna.id, 1_000).await;
    env.seed_advance(anna.id, 2_000).await;
    env.seed_advance(anna.id, 3_000).await;

    let query = r#"
        query Advances($employeeId: ID!, $page: PageInput) {
            payroll {
                advances(employeeId: $employeeId, page: $page) {
                    items { amountCents }
                    pageInfo { totalItems }
                }
            }
        }
    "#;
    let resp = env
        .exec(
            query,
            json!({ "employeeId": anna.id.to_string(), "page": { "page": 1, "pageSize": 2 } }),
        )
        .await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    let payload = resp.data.into_json().unwrap()["payroll"]["advances"].clone();
    assert_eq!(payload["pageInfo"]["totalItems"].as_u64().unwrap(), 3);
    assert_eq!(payload["items"].as_array().unwrap().len(), 2);
}
