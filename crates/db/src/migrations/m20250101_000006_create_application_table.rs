//! Create applications table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Applications::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Applications::ShiftId).string_len(32).not_null())
                    .col(ColumnDef::new(Applications::NurseId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Applications::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Applications::SpecialNotes).text())
                    .col(
                        ColumnDef::new(Applications::AvailabilityConfirmed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Applications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Applications::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_shift")
                            .from(Applications::Table, Applications::ShiftId)
                            .to(Shifts::Table, Shifts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_nurse")
                            .from(Applications::Table, Applications::NurseId)
                            .to(NurseProfiles::Table, NurseProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applications_shift_id")
                    .table(Applications::Table)
                    .col(Applications::ShiftId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applications_nurse_id")
                    .table(Applications::Table)
                    .col(Applications::NurseId)
                    .to_owned(),
            )
            .await?;

        // At most one live application per nurse and shift
        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_applications_active_nurse_shift
                ON applications (nurse_id, shift_id)
                WHERE status IN ('pending', 'approved');
                ",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_applications_active_nurse_shift;")
            .await?;
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Applications {
    Table,
    Id,
    ShiftId,
    NurseId,
    Status,
    SpecialNotes,
    AvailabilityConfirmed,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Shifts {
    Table,
    Id,
}

#[derive(Iden)]
enum NurseProfiles {
    Table,
    Id,
}
