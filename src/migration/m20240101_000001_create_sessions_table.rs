use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sessions::SessionId).string_len(80).not_null())
                    .col(
                        ColumnDef::new(Sessions::ApplicationName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::Expires)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sessions::TimeoutMinutes).integer().not_null())
                    .col(ColumnDef::new(Sessions::Locked).boolean().not_null())
                    .col(ColumnDef::new(Sessions::LockId).integer().not_null())
                    .col(
                        ColumnDef::new(Sessions::LockDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sessions::Data).binary().not_null())
                    .col(ColumnDef::new(Sessions::Flags).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(Sessions::SessionId)
                            .col(Sessions::ApplicationName),
                    )
                    .to_owned(),
            )
            .await?;

        // Covers the sweep scan (application_name = ? AND expires < now).
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sessions_expiry_scan")
                    .table(Sessions::Table)
                    .col(Sessions::ApplicationName)
                    .col(Sessions::Expires)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    SessionId,
    ApplicationName,
    Created,
    Expires,
    TimeoutMinutes,
    Locked,
    LockId,
    LockDate,
    Data,
    Flags,
}
