//! Create the `entries` table, one row per detailing service record.
//!
//! `location` and `photos` are nullable; every other column is required.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entries::Table)
                    .if_not_exists()
                    .col(big_integer(Entries::Id).primary_key().auto_increment())
                    .col(string_len(Entries::LicensePlate, 20).not_null())
                    .col(string_len(Entries::ServiceType, 100).not_null())
                    .col(string_len(Entries::Technician, 100).not_null())
                    .col(
                        ColumnDef::new(Entries::Location)
                            .string_len(100)
                            .null(),
                    )
                    .col(double(Entries::Hours).not_null())
                    .col(date(Entries::EntryDate).not_null())
                    .col(
                        ColumnDef::new(Entries::Notes)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Entries::Photos)
                            .text()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Entries::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Entries::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Entries { Table, Id, LicensePlate, ServiceType, Technician, Location, Hours, EntryDate, Notes, Photos, CreatedAt }
