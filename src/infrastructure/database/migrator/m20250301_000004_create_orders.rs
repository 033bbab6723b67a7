//! Create orders, order_services and order_extra_services tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn money(col: Orders) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().default(0).to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::UserId).string().not_null())
                    .col(ColumnDef::new(Orders::ServiceTypeId).integer().not_null())
                    .col(ColumnDef::new(Orders::ServiceTypeName).string().not_null())
                    .col(ColumnDef::new(Orders::FirstName).string().not_null())
                    .col(ColumnDef::new(Orders::LastName).string().not_null())
                    .col(ColumnDef::new(Orders::Email).string().not_null())
                    .col(ColumnDef::new(Orders::Phone).string().not_null())
                    .col(ColumnDef::new(Orders::Address).string().not_null())
                    .col(ColumnDef::new(Orders::AptSuite).string())
                    .col(ColumnDef::new(Orders::City).string().not_null())
                    .col(ColumnDef::new(Orders::State).string().not_null())
                    .col(ColumnDef::new(Orders::ZipCode).string().not_null())
                    .col(ColumnDef::new(Orders::ServiceDate).date().not_null())
                    .col(ColumnDef::new(Orders::ServiceTime).time().not_null())
                    .col(ColumnDef::new(Orders::EntryMethod).string())
                    .col(ColumnDef::new(Orders::SpecialInstructions).text())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(20)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(money(Orders::SubTotal))
                    .col(money(Orders::Tax))
                    .col(money(Orders::Tips))
                    .col(money(Orders::DiscountAmount))
                    .col(money(Orders::SubscriptionDiscountAmount))
                    .col(money(Orders::GiftCardAmountUsed))
                    .col(money(Orders::Total))
                    .col(
                        ColumnDef::new(Orders::TotalDuration)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Orders::MaidsCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Orders::PromoCode).string())
                    .col(ColumnDef::new(Orders::PromoCodeId).integer())
                    .col(ColumnDef::new(Orders::GiftCardCode).string())
                    .col(ColumnDef::new(Orders::SubscriptionId).integer())
                    .col(
                        ColumnDef::new(Orders::IsPaid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Orders::PaidAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Orders::CancellationReason).string())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_user")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_promo_code")
                    .table(Orders::Table)
                    .col(Orders::PromoCodeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderServices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderServices::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderServices::ServiceId).integer().not_null())
                    .col(ColumnDef::new(OrderServices::ServiceName).string().not_null())
                    .col(ColumnDef::new(OrderServices::Quantity).integer().not_null())
                    .col(ColumnDef::new(OrderServices::Cost).big_integer().not_null())
                    .col(ColumnDef::new(OrderServices::Duration).integer().not_null())
                    .col(
                        ColumnDef::new(OrderServices::PriceMultiplier)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_services_order")
                            .from(OrderServices::Table, OrderServices::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderExtraServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderExtraServices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderExtraServices::OrderId).integer().not_null())
                    .col(
                        ColumnDef::new(OrderExtraServices::ExtraServiceId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderExtraServices::ExtraServiceName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderExtraServices::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(OrderExtraServices::Hours)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(OrderExtraServices::Cost).big_integer().not_null())
                    .col(ColumnDef::new(OrderExtraServices::Duration).integer().not_null())
                    .col(
                        ColumnDef::new(OrderExtraServices::PriceMultiplier)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_extra_services_order")
                            .from(OrderExtraServices::Table, OrderExtraServices::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderExtraServices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderServices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden, Clone, Copy)]
pub enum Orders {
    Table,
    Id,
    UserId,
    ServiceTypeId,
    ServiceTypeName,
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    AptSuite,
    City,
    State,
    ZipCode,
    ServiceDate,
    ServiceTime,
    EntryMethod,
    SpecialInstructions,
    Status,
    SubTotal,
    Tax,
    Tips,
    DiscountAmount,
    SubscriptionDiscountAmount,
    GiftCardAmountUsed,
    Total,
    TotalDuration,
    MaidsCount,
    PromoCode,
    PromoCodeId,
    GiftCardCode,
    SubscriptionId,
    IsPaid,
    PaidAt,
    CancellationReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum OrderServices {
    Table,
    Id,
    OrderId,
    ServiceId,
    ServiceName,
    Quantity,
    Cost,
    Duration,
    PriceMultiplier,
}

#[derive(Iden)]
pub enum OrderExtraServices {
    Table,
    Id,
    OrderId,
    ExtraServiceId,
    ExtraServiceName,
    Quantity,
    Hours,
    Cost,
    Duration,
    PriceMultiplier,
}
