//! Session-side tables: parking sessions, their append-only transition log,
//! violations, and the top-up history ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingSessions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::Kind)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ParkingSessions::AccountId).integer().not_null())
                    .col(ColumnDef::new(ParkingSessions::GuardId).integer().not_null())
                    .col(
                        ColumnDef::new(ParkingSessions::TimeIn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::TimeOut)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(ParkingSessions::DurationMinutes).big_integer())
                    .to_owned(),
            )
            .await?;

        // The open-session lookup filters on (kind, account_id, time_out).
        manager
            .create_index(
                Index::create()
                    .name("idx_parking_sessions_account_open")
                    .table(ParkingSessions::Table)
                    .col(ParkingSessions::Kind)
                    .col(ParkingSessions::AccountId)
                    .col(ParkingSessions::TimeOut)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SessionLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SessionLogs::SessionId).integer().not_null())
                    .col(ColumnDef::new(SessionLogs::Action).string_len(16).not_null())
                    .col(
                        ColumnDef::new(SessionLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_logs_session_id")
                            .from(SessionLogs::Table, SessionLogs::SessionId)
                            .to(ParkingSessions::Table, ParkingSessions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Violations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Violations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Violations::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Violations::AccountId).integer().not_null())
                    .col(ColumnDef::new(Violations::SessionId).integer())
                    .col(ColumnDef::new(Violations::Notes).string().not_null())
                    .col(ColumnDef::new(Violations::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Violations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_violations_session_id")
                            .from(Violations::Table, Violations::SessionId)
                            .to(ParkingSessions::Table, ParkingSessions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The check-in gate counts unresolved rows per account.
        manager
            .create_index(
                Index::create()
                    .name("idx_violations_account_status")
                    .table(Violations::Table)
                    .col(Violations::Kind)
                    .col(Violations::AccountId)
                    .col(Violations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TopUpHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TopUpHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TopUpHistory::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(TopUpHistory::AccountId).integer().not_null())
                    .col(ColumnDef::new(TopUpHistory::OperatorId).integer().not_null())
                    .col(
                        ColumnDef::new(TopUpHistory::LoadAmount)
                            // sqlite's builder caps decimal precision at 16
                            .decimal_len(12, 4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TopUpHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TopUpHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Violations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ParkingSessions::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ParkingSessions {
    Table,
    Id,
    Kind,
    AccountId,
    GuardId,
    TimeIn,
    TimeOut,
    DurationMinutes,
}

#[derive(DeriveIden)]
enum SessionLogs {
    Table,
    Id,
    SessionId,
    Action,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Violations {
    Table,
    Id,
    Kind,
    AccountId,
    SessionId,
    Notes,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TopUpHistory {
    Table,
    Id,
    Kind,
    AccountId,
    OperatorId,
    LoadAmount,
    CreatedAt,
}
