//! Create service_types, services and extra_services tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceTypes::Name).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(ServiceTypes::BasePrice)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ServiceTypes::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ServiceTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ServiceTypes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceTypes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Services::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Services::ServiceTypeId).integer().not_null())
                    .col(ColumnDef::new(Services::Name).string().not_null())
                    .col(ColumnDef::new(Services::ServiceKey).string().not_null())
                    .col(ColumnDef::new(Services::Cost).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Services::TimeDuration)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Services::InputType)
                            .string()
                            .not_null()
                            .default("dropdown"),
                    )
                    .col(ColumnDef::new(Services::MinValue).integer())
                    .col(ColumnDef::new(Services::MaxValue).integer())
                    .col(ColumnDef::new(Services::RelationType).string())
                    .col(
                        ColumnDef::new(Services::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Services::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_services_service_type")
                            .from(Services::Table, Services::ServiceTypeId)
                            .to(ServiceTypes::Table, ServiceTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_services_service_type")
                    .table(Services::Table)
                    .col(Services::ServiceTypeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExtraServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExtraServices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExtraServices::ServiceTypeId).integer())
                    .col(ColumnDef::new(ExtraServices::Name).string().not_null())
                    .col(
                        ColumnDef::new(ExtraServices::Price)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ExtraServices::Duration)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ExtraServices::HasQuantity)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExtraServices::HasHours)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExtraServices::IsDeepCleaning)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExtraServices::IsSuperDeepCleaning)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExtraServices::IsSameDayService)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExtraServices::PriceMultiplier)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(
                        ColumnDef::new(ExtraServices::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExtraServices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceTypes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ServiceTypes {
    Table,
    Id,
    Name,
    BasePrice,
    DisplayOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Services {
    Table,
    Id,
    ServiceTypeId,
    Name,
    ServiceKey,
    Cost,
    TimeDuration,
    InputType,
    MinValue,
    MaxValue,
    RelationType,
    DisplayOrder,
    IsActive,
}

#[derive(Iden)]
pub enum ExtraServices {
    Table,
    Id,
    ServiceTypeId,
    Name,
    Price,
    Duration,
    HasQuantity,
    HasHours,
    IsDeepCleaning,
    IsSuperDeepCleaning,
    IsSameDayService,
    PriceMultiplier,
    IsActive,
}
