//! Create facilities table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Facilities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Facilities::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Facilities::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Facilities::Email).string_len(320).not_null())
                    .col(ColumnDef::new(Facilities::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(Facilities::Address).string_len(256).not_null())
                    .col(ColumnDef::new(Facilities::City).string_len(128).not_null())
                    .col(ColumnDef::new(Facilities::State).string_len(64).not_null())
                    .col(ColumnDef::new(Facilities::ZipCode).string_len(16).not_null())
                    .col(ColumnDef::new(Facilities::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(Facilities::ContactName).string_len(128))
                    .col(ColumnDef::new(Facilities::FacilityType).string_len(64))
                    .col(ColumnDef::new(Facilities::Rating).double())
                    .col(
                        ColumnDef::new(Facilities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Facilities::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_facilities_email")
                    .table(Facilities::Table)
                    .col(Facilities::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Facilities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Facilities {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Address,
    City,
    State,
    ZipCode,
    Phone,
    ContactName,
    FacilityType,
    Rating,
    CreatedAt,
    UpdatedAt,
}
