//! Create shifts table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shifts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Shifts::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Shifts::FacilityId).string_len(32).not_null())
                    .col(ColumnDef::new(Shifts::Unit).string_len(128).not_null())
                    .col(ColumnDef::new(Shifts::ShiftType).string_len(16).not_null())
                    .col(ColumnDef::new(Shifts::StartTime).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Shifts::EndTime).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Shifts::HourlyRate).double().not_null())
                    .col(
                        ColumnDef::new(Shifts::Status)
                            .string_len(16)
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(Shifts::Requirements)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Shifts::Specialty).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Shifts::UrgentFill)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Shifts::FacilityRating).double())
                    .col(ColumnDef::new(Shifts::Description).text())
                    .col(
                        ColumnDef::new(Shifts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Shifts::UpdatedAt).timestamp_with_time_zone())
                    .check(Expr::col(Shifts::EndTime).gt(Expr::col(Shifts::StartTime)))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shifts_facility")
                            .from(Shifts::Table, Shifts::FacilityId)
                            .to(Facilities::Table, Facilities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shifts_facility_id")
                    .table(Shifts::Table)
                    .col(Shifts::FacilityId)
                    .to_owned(),
            )
            .await?;

        // Index: (status, start_time) for the open-shift listing
        manager
            .create_index(
                Index::create()
                    .name("idx_shifts_status_start_time")
                    .table(Shifts::Table)
                    .col(Shifts::Status)
                    .col(Shifts::StartTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Shifts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Shifts {
    Table,
    Id,
    FacilityId,
    Unit,
    ShiftType,
    StartTime,
    EndTime,
    HourlyRate,
    Status,
    Requirements,
    Specialty,
    UrgentFill,
    FacilityRating,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Facilities {
    Table,
    Id,
}
