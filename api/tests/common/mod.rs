use std::sync::Arc;

use api::schema::{AppSchema, SchemaType, build_schema};
use async_graphql::{Request, ServerError, Value as GqlValue, Variables};
use chrono::{NaiveDate, Utc};
use entity::{advance, employee, work_entry};
use ledger::TenantContext;
use ledger::payments::AllocationConfig;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, Database, DatabaseBackend,
    DatabaseConnection, Statement,
};
use serde_json::Value;
use uuid::Uuid;

pub struct TestEnv {
    pub db: Arc<DatabaseConnection>,
    pub schema: SchemaType,
    pub tenant: TenantContext,
}

pub async fn setup() -> TestEnv {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    let db = Arc::new(conn);
    bootstrap_sqlite(db.as_ref()).await;
    let AppSchema(schema) = build_schema(db.clone(), AllocationConfig::default());
    TestEnv {
        db,
        schema,
        tenant: TenantContext::new(Uuid::new_v4()),
    }
}

impl TestEnv {
    pub async fn exec(&self, query: &str, vars: Value) -> async_graphql::Response {
        self.exec_as(self.tenant, query, vars).await
    }

    pub async fn exec_as(
        &self,
        tenant: TenantContext,
        query: &str,
        vars: Value,
    ) -> async_graphql::Response {
        self.schema
            .execute(
                Request::new(query)
                    .variables(Variables::from_json(vars))
                    .data(tenant),
            )
            .await
    }

    pub async fn exec_anonymous(&self, query: &str, vars: Value) -> async_graphql::Response {
        self.schema
            .execute(Request::new(query).variables(Variables::from_json(vars)))
            .await
    }

    pub async fn seed_employee(&self, name: &str) -> employee::Model {
        self.seed_employee_for(self.tenant, name).await
    }

    pub async fn seed_employee_for(
        &self,
        tenant: TenantContext,
        name: &str,
    ) -> employee::Model {
        let now = Utc::now().into();
        employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant.tenant_id),
            name: Set(name.to_string()),
            daily_rate_cents: Set(10_000),
            half_day_rate_cents: Set(6_000),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .unwrap()
    }

    pub async fn seed_entry(
        &self,
        employee_id: Uuid,
        day: NaiveDate,
        total_cents: i64,
        payed_cents: i64,
    ) -> work_entry::Model {
        self.seed_entry_with(self.tenant, employee_id, day, total_cents, payed_cents, None)
            .await
    }

    pub async fn seed_entry_with(
        &self,
        tenant: TenantContext,
        employee_id: Uuid,
        day: NaiveDate,
        total_cents: i64,
        payed_cents: i64,
        notes: Option<&str>,
    ) -> work_entry::Model {
        let now = Utc::now().into();
        work_entry::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant.tenant_id),
            employee_id: Set(employee_id),
            worked_day: Set(day),
            work_type: Set(work_entry::WorkType::FullDay),
            salary_amount_cents: Set(total_cents),
            extras_cents: Set(0),
            total_cents: Set(total_cents),
            payed_amount_cents: Set(payed_cents),
            is_paid: Set(payed_cents >= total_cents),
            notes: Set(notes.map(|n| n.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .unwrap()
    }

    pub async fn seed_advance(&self, employee_id: Uuid, amount_cents: i64) -> advance::Model {
        let now = Utc::now().into();
        advance::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(self.tenant.tenant_id),
            employee_id: Set(employee_id),
            amount_cents: Set(amount_cents),
            date: Set(now),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
        .unwrap()
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn has_error_code(errors: &[ServerError], code: &str) -> bool {
    errors.iter().any(|e| {
        matches!(
            e.extensions.as_ref().and_then(|ext| ext.get("code")),
            Some(GqlValue::String(s)) if s == code
        )
    })
}

async fn bootstrap_sqlite(db: &DatabaseConnection) {
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;",
    ))
    .await
    .unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE employee (
            id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL,
            name TEXT NOT NULL,
            daily_rate_cents INTEGER NOT NULL,
            half_day_rate_cents INTEGER NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    ))
    .await
    .unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE work_entry (
            id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL,
            employee_id TEXT NOT NULL,
            worked_day TEXT NOT NULL,
            work_type TEXT NOT NULL,
            salary_amount_cents INTEGER NOT NULL,
            extras_cents INTEGER NOT NULL DEFAULT 0,
            total_cents INTEGER NOT NULL,
            payed_amount_cents INTEGER NOT NULL DEFAULT 0,
            is_paid INTEGER NOT NULL DEFAULT 0,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(employee_id) REFERENCES employee(id) ON DELETE CASCADE
        );
        "#,
    ))
    .await
    .unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE advance (
            id TEXT PRIMARY KEY,
            tenant_id TEXT NOT NULL,
            employee_id TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            date TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(employee_id) REFERENCES employee(id) ON DELETE CASCADE
        );
        "#,
    ))
    .await
    .unwrap();
}
