use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub tenant_id: Uuid,
    #[sea_orm(indexed)]
    pub name: String,
    pub daily_rate_cents: i64,
    pub half_day_rate_cents: i64,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    WorkEntry,
    Advance,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::WorkEntry => Entity::has_many(super::work_entry::Entity).into(),
            Self::Advance => Entity::has_many(super::advance::Entity).into(),
        }
    }
}

impl Related<super::work_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkEntry.def()
    }
}

impl Related<super::advance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Advance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
