use sea_orm::entity::prelude::*;

/// One day's wage record. `total_cents` and `is_paid` are derived by the
/// ledger and never trusted from callers.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "work_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub tenant_id: Uuid,
    #[sea_orm(indexed)]
    pub employee_id: Uuid,
    #[sea_orm(indexed)]
    pub worked_day: Date,
    pub work_type: WorkType,
    pub salary_amount_cents: i64,
    pub extras_cents: i64,
    pub total_cents: i64,
    pub payed_amount_cents: i64,
    pub is_paid: bool,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum WorkType {
    #[sea_orm(string_value = "FULL_DAY")]
    FullDay,
    #[sea_orm(string_value = "HALF_DAY")]
    HalfDay,
}

impl ActiveModelBehavior for ActiveModel {}
