use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
    TenantId,
    Name,
    DailyRateCents,
    HalfDayRateCents,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum WorkEntry {
    Table,
    Id,
    TenantId,
    EmployeeId,
    WorkedDay,
    WorkType,
    SalaryAmountCents,
    ExtrasCents,
    TotalCents,
    PayedAmountCents,
    IsPaid,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Advance {
    Table,
    Id,
    TenantId,
    EmployeeId,
    AmountCents,
    Date,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employee::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employee::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Employee::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Employee::DailyRateCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employee::HalfDayRateCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employee::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Employee::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employee::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_tenant_name")
                    .table(Employee::Table)
                    .col(Employee::TenantId)
                    .col(Employee::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkEntry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkEntry::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkEntry::TenantId).uuid().not_null())
                    .col(ColumnDef::new(WorkEntry::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(WorkEntry::WorkedDay).date().not_null())
                    .col(
                        ColumnDef::new(WorkEntry::WorkType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkEntry::SalaryAmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkEntry::ExtrasCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WorkEntry::TotalCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkEntry::PayedAmountCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WorkEntry::IsPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(WorkEntry::Notes).text())
                    .col(
                        ColumnDef::new(WorkEntry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkEntry::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_entry_employee")
                            .from(WorkEntry::Table, WorkEntry::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_work_entry_tenant_employee_day")
                    .table(WorkEntry::Table)
                    .col(WorkEntry::TenantId)
                    .col(WorkEntry::EmployeeId)
                    .col(WorkEntry::WorkedDay)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_work_entry_tenant_paid")
                    .table(WorkEntry::Table)
                    .col(WorkEntry::TenantId)
                    .col(WorkEntry::IsPaid)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Advance::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Advance::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Advance::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Advance::EmployeeId).uuid().not_null())
                    .col(
                        ColumnDef::new(Advance::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Advance::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Advance::Notes).text())
                    .col(
                        ColumnDef::new(Advance::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Advance::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_advance_employee")
                            .from(Advance::Table, Advance::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_advance_tenant_employee_date")
                    .table(Advance::Table)
                    .col(Advance::TenantId)
                    .col(Advance::EmployeeId)
                    .col(Advance::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Advance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkEntry::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await?;
        Ok(())
    }
}
