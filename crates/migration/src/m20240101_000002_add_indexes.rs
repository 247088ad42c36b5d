use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Entries: "most recent" queries sort on entry_date
        manager
            .create_index(
                Index::create()
                    .name("idx_entries_entry_date")
                    .table(Entries::Table)
                    .col(Entries::EntryDate)
                    .to_owned(),
            )
            .await?;

        // Entries: exact-match plate lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_entries_license_plate")
                    .table(Entries::Table)
                    .col(Entries::LicensePlate)
                    .to_owned(),
            )
            .await?;

        // Entries: created_at tie-breaking and retention sweeps
        manager
            .create_index(
                Index::create()
                    .name("idx_entries_created_at")
                    .table(Entries::Table)
                    .col(Entries::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_entries_entry_date").table(Entries::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_entries_license_plate").table(Entries::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_entries_created_at").table(Entries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Entries { Table, EntryDate, LicensePlate, CreatedAt }
