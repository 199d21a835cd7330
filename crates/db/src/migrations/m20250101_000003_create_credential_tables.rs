//! Create licenses and certifications tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Licenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Licenses::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Licenses::NurseId).string_len(32).not_null())
                    .col(ColumnDef::new(Licenses::LicenseType).string_len(64).not_null())
                    .col(ColumnDef::new(Licenses::LicenseNumber).string_len(64).not_null())
                    .col(ColumnDef::new(Licenses::IssuingState).string_len(64).not_null())
                    .col(ColumnDef::new(Licenses::ExpiryDate).date().not_null())
                    .col(
                        ColumnDef::new(Licenses::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Licenses::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Licenses::DocumentUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Licenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Licenses::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_licenses_nurse")
                            .from(Licenses::Table, Licenses::NurseId)
                            .to(NurseProfiles::Table, NurseProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_licenses_nurse_id")
                    .table(Licenses::Table)
                    .col(Licenses::NurseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Certifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Certifications::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Certifications::NurseId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Certifications::CertificationName)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Certifications::IssuingOrganization)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Certifications::CertificationNumber).string_len(64))
                    .col(ColumnDef::new(Certifications::IssueDate).date())
                    .col(ColumnDef::new(Certifications::ExpiryDate).date().not_null())
                    .col(
                        ColumnDef::new(Certifications::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Certifications::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Certifications::DocumentUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Certifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Certifications::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_certifications_nurse")
                            .from(Certifications::Table, Certifications::NurseId)
                            .to(NurseProfiles::Table, NurseProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_certifications_nurse_id")
                    .table(Certifications::Table)
                    .col(Certifications::NurseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Certifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Licenses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Licenses {
    Table,
    Id,
    NurseId,
    LicenseType,
    LicenseNumber,
    IssuingState,
    ExpiryDate,
    Status,
    IsVerified,
    DocumentUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Certifications {
    Table,
    Id,
    NurseId,
    CertificationName,
    IssuingOrganization,
    CertificationNumber,
    IssueDate,
    ExpiryDate,
    Status,
    IsVerified,
    DocumentUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum NurseProfiles {
    Table,
    Id,
}
