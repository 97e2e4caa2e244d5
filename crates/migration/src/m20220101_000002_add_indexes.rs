use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users: email and phone are globally unique. The adapter reads the
        // index name back out of violation errors to report the field.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_user_email")
                    .table(User::Table)
                    .col(User::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_user_phone")
                    .table(User::Table)
                    .col(User::Phone)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // UserFile: index on user_id
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_file_user")
                    .table(UserFile::Table)
                    .col(UserFile::UserId)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_user_file_user").table(UserFile::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_user_phone").table(User::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_user_email").table(User::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User { Table, Email, Phone }

#[derive(DeriveIden)]
enum UserFile { Table, UserId }
