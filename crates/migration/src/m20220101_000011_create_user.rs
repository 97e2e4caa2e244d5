//! Create `user` table.
//!
//! Stores registered identities together with their opaque credential.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    // Unique indexes on email/phone are named in the index migration
                    .col(string_len(User::Email, 255).not_null())
                    .col(string_len(User::Phone, 32).not_null())
                    .col(string_len(User::Name, 128).not_null())
                    .col(string_len(User::Password, 255).not_null())
                    .col(boolean(User::EmailConfirmed).default(false).not_null())
                    .col(boolean(User::PhoneConfirmed).default(false).not_null())
                    .col(string_len(User::Status, 32).not_null())
                    .col(timestamp_with_time_zone(User::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(User::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Email,
    Phone,
    Name,
    Password,
    EmailConfirmed,
    PhoneConfirmed,
    Status,
    CreatedAt,
    UpdatedAt,
}
