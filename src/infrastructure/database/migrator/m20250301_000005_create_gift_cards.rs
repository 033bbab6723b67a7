//! Create gift_cards and gift_card_usages tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GiftCards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GiftCards::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GiftCards::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(GiftCards::OriginalAmount).big_integer().not_null())
                    .col(ColumnDef::new(GiftCards::CurrentBalance).big_integer().not_null())
                    .col(
                        ColumnDef::new(GiftCards::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(GiftCards::IsPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(GiftCards::PurchaserUserId).string())
                    .col(ColumnDef::new(GiftCards::RecipientEmail).string())
                    .col(
                        ColumnDef::new(GiftCards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GiftCards::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(GiftCards::CurrentBalance).gte(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GiftCardUsages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GiftCardUsages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GiftCardUsages::GiftCardId).integer().not_null())
                    .col(ColumnDef::new(GiftCardUsages::OrderId).integer().not_null())
                    .col(ColumnDef::new(GiftCardUsages::UserId).string().not_null())
                    .col(ColumnDef::new(GiftCardUsages::AmountUsed).big_integer().not_null())
                    .col(ColumnDef::new(GiftCardUsages::BalanceBefore).big_integer().not_null())
                    .col(ColumnDef::new(GiftCardUsages::BalanceAfter).big_integer().not_null())
                    .col(
                        ColumnDef::new(GiftCardUsages::UsedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gift_card_usages_card")
                            .from(GiftCardUsages::Table, GiftCardUsages::GiftCardId)
                            .to(GiftCards::Table, GiftCards::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gift_card_usages_order")
                            .from(GiftCardUsages::Table, GiftCardUsages::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_gift_card_usages_card")
                    .table(GiftCardUsages::Table)
                    .col(GiftCardUsages::GiftCardId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GiftCardUsages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GiftCards::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
}

#[derive(Iden)]
pub enum GiftCards {
    Table,
    Id,
    Code,
    OriginalAmount,
    CurrentBalance,
    IsActive,
    IsPaid,
    PurchaserUserId,
    RecipientEmail,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum GiftCardUsages {
    Table,
    Id,
    GiftCardId,
    OrderId,
    UserId,
    AmountUsed,
    BalanceBefore,
    BalanceAfter,
    UsedAt,
}
