use sea_orm_migration::{prelude::*, schema::*};

/// Name of the unique constraint on `users.email`; the repository matches on it.
pub const EMAIL_CONSTRAINT: &str = "users_email_key";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        uuid(Users::Id)
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(text(Users::FirstName))
                    .col(text(Users::LastName))
                    .col(text(Users::Nickname))
                    .col(text(Users::Password))
                    .col(text(Users::Email))
                    .col(text(Users::Country))
                    .col(
                        timestamp_with_time_zone(Users::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Named so unique violations can be told apart from other constraints
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "ALTER TABLE users ADD CONSTRAINT {EMAIL_CONSTRAINT} UNIQUE (email)"
            ))
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_country")
                    .table(Users::Table)
                    .col(Users::Country)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_created_at_id")
                    .table(Users::Table)
                    .col(Users::CreatedAt)
                    .col(Users::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    Nickname,
    Password,
    Email,
    Country,
    CreatedAt,
    UpdatedAt,
}
