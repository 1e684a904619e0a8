//! Account-side tables: the three account kinds, their vehicles and
//! licenses, and the RFID token table binding everything together.

use sea_orm_migration::prelude::*;

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
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Premiums::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Premiums::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Premiums::FirstName).string().not_null())
                    .col(ColumnDef::new(Premiums::LastName).string().not_null())
                    .col(ColumnDef::new(Premiums::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Premiums::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Visitors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Visitors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Visitors::FirstName).string().not_null())
                    .col(ColumnDef::new(Visitors::LastName).string().not_null())
                    .col(ColumnDef::new(Visitors::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Visitors::PlateNumber).string())
                    .col(ColumnDef::new(Visitors::VehicleMake).string())
                    .col(ColumnDef::new(Visitors::VehicleColor).string())
                    .col(
                        ColumnDef::new(Visitors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::UserId).integer())
                    .col(ColumnDef::new(Vehicles::PremiumId).integer())
                    .col(ColumnDef::new(Vehicles::PlateNumber).string().not_null())
                    .col(ColumnDef::new(Vehicles::Make).string())
                    .col(ColumnDef::new(Vehicles::Model).string())
                    .col(ColumnDef::new(Vehicles::Color).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_user_id")
                    .table(Vehicles::Table)
                    .col(Vehicles::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_premium_id")
                    .table(Vehicles::Table)
                    .col(Vehicles::PremiumId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Licenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Licenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Licenses::UserId).integer())
                    .col(ColumnDef::new(Licenses::PremiumId).integer())
                    .col(ColumnDef::new(Licenses::LicenseNumber).string().not_null())
                    .col(ColumnDef::new(Licenses::ExpiryDate).date())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RfidTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RfidTokens::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RfidTokens::Value).string().not_null())
                    .col(
                        ColumnDef::new(RfidTokens::LoadBalance)
                            // sqlite's builder caps decimal precision at 16
                            .decimal_len(12, 4)
                            .not_null()
                            .default("0"),
                    )
                    .col(ColumnDef::new(RfidTokens::UserId).integer())
                    .col(ColumnDef::new(RfidTokens::PremiumId).integer())
                    .col(ColumnDef::new(RfidTokens::VisitorId).integer())
                    .col(ColumnDef::new(RfidTokens::VehicleId).integer())
                    .to_owned(),
            )
            .await?;

        // Token values are unique facility-wide; the resolver's probe order
        // is only a tie-break for data that violates this.
        manager
            .create_index(
                Index::create()
                    .name("idx_rfid_tokens_value")
                    .table(RfidTokens::Table)
                    .col(RfidTokens::Value)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RfidTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Licenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Visitors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Premiums::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
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
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Premiums {
    Table,
    Id,
    FirstName,
    LastName,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Visitors {
    Table,
    Id,
    FirstName,
    LastName,
    Status,
    PlateNumber,
    VehicleMake,
    VehicleColor,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    UserId,
    PremiumId,
    PlateNumber,
    Make,
    Model,
    Color,
}

#[derive(DeriveIden)]
enum Licenses {
    Table,
    Id,
    UserId,
    PremiumId,
    LicenseNumber,
    ExpiryDate,
}

#[derive(DeriveIden)]
enum RfidTokens {
    Table,
    Id,
    Value,
    LoadBalance,
    UserId,
    PremiumId,
    VisitorId,
    VehicleId,
}
