//! Create nurse_profiles table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NurseProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NurseProfiles::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(NurseProfiles::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(NurseProfiles::Specialty).string_len(128).not_null())
                    .col(
                        ColumnDef::new(NurseProfiles::YearsExperience)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(NurseProfiles::PreferredShiftType).string_len(16))
                    .col(
                        ColumnDef::new(NurseProfiles::PreferredDistance)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(NurseProfiles::MinHourlyRate).double().not_null())
                    .col(ColumnDef::new(NurseProfiles::MaxHourlyRate).double().not_null())
                    .col(ColumnDef::new(NurseProfiles::Bio).text())
                    .col(
                        ColumnDef::new(NurseProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(NurseProfiles::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nurse_profiles_user")
                            .from(NurseProfiles::Table, NurseProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: user_id (one profile per user)
        manager
            .create_index(
                Index::create()
                    .name("idx_nurse_profiles_user_id")
                    .table(NurseProfiles::Table)
                    .col(NurseProfiles::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NurseProfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum NurseProfiles {
    Table,
    Id,
    UserId,
    Specialty,
    YearsExperience,
    PreferredShiftType,
    PreferredDistance,
    MinHourlyRate,
    MaxHourlyRate,
    Bio,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
