//! Create promo_codes table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PromoCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PromoCodes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PromoCodes::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(PromoCodes::Description).string())
                    .col(
                        ColumnDef::new(PromoCodes::DiscountType)
                            .string_len(20)
                            .not_null()
                            .default("Percentage"),
                    )
                    .col(
                        ColumnDef::new(PromoCodes::DiscountValue)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(PromoCodes::ValidFrom).timestamp_with_time_zone())
                    .col(ColumnDef::new(PromoCodes::ValidTo).timestamp_with_time_zone())
                    .col(ColumnDef::new(PromoCodes::MaxUsageCount).integer())
                    .col(ColumnDef::new(PromoCodes::MaxUsagePerUser).integer())
                    .col(
                        ColumnDef::new(PromoCodes::CurrentUsageCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PromoCodes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PromoCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PromoCodes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PromoCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum PromoCodes {
    Table,
    Id,
    Code,
    Description,
    DiscountType,
    DiscountValue,
    ValidFrom,
    ValidTo,
    MaxUsageCount,
    MaxUsagePerUser,
    CurrentUsageCount,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
