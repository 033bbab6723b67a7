//! Seed the default catalog and subscription plans

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        let service_type = Query::insert()
            .into_table(ServiceTypes::Table)
            .columns([
                ServiceTypes::Name,
                ServiceTypes::BasePrice,
                ServiceTypes::DisplayOrder,
                ServiceTypes::IsActive,
                ServiceTypes::CreatedAt,
                ServiceTypes::UpdatedAt,
            ])
            .values_panic([
                "Standard Cleaning".into(),
                10000i64.into(), // 100.00
                0.into(),
                true.into(),
                now.clone().into(),
                now.clone().into(),
            ])
            .to_owned();
        manager.exec_stmt(service_type).await?;

        // (name, key, cost cents, minutes, input, min, max, relation)
        let services: [(&str, &str, i64, i32, &str, i32, i32, Option<&str>); 4] = [
            ("Bedrooms", "bedrooms", 1000, 30, "dropdown", 0, 6, None),
            ("Bathrooms", "bathrooms", 1500, 45, "dropdown", 1, 5, None),
            ("Cleaners", "cleaners", 2500, 60, "range", 1, 4, Some("cleaner")),
            ("Hours", "hours", 0, 60, "range", 2, 8, Some("hours")),
        ];
        let mut insert = Query::insert()
            .into_table(Services::Table)
            .columns([
                Services::ServiceTypeId,
                Services::Name,
                Services::ServiceKey,
                Services::Cost,
                Services::TimeDuration,
                Services::InputType,
                Services::MinValue,
                Services::MaxValue,
                Services::RelationType,
                Services::DisplayOrder,
                Services::IsActive,
            ])
            .to_owned();
        for (order, (name, key, cost, minutes, input, min, max, relation)) in
            services.into_iter().enumerate()
        {
            insert.values_panic([
                1.into(),
                name.into(),
                key.into(),
                cost.into(),
                minutes.into(),
                input.into(),
                min.into(),
                max.into(),
                relation.map(str::to_string).into(),
                (order as i32).into(),
                true.into(),
            ]);
        }
        manager.exec_stmt(insert).await?;

        // (name, price cents, minutes, qty, hours, deep, super deep, same day, multiplier)
        let extras: [(&str, i64, i32, bool, bool, bool, bool, bool, f64); 5] = [
            ("Deep Cleaning", 2000, 60, false, false, true, false, false, 1.25),
            ("Super Deep Cleaning", 3000, 120, false, false, false, true, false, 1.5),
            ("Same Day Service", 4000, 0, false, false, false, false, true, 1.0),
            ("Inside Fridge", 2500, 30, true, false, false, false, false, 1.0),
            ("Inside Cabinets", 3000, 60, false, true, false, false, false, 1.0),
        ];
        let mut insert = Query::insert()
            .into_table(ExtraServices::Table)
            .columns([
                ExtraServices::Name,
                ExtraServices::Price,
                ExtraServices::Duration,
                ExtraServices::HasQuantity,
                ExtraServices::HasHours,
                ExtraServices::IsDeepCleaning,
                ExtraServices::IsSuperDeepCleaning,
                ExtraServices::IsSameDayService,
                ExtraServices::PriceMultiplier,
                ExtraServices::IsActive,
            ])
            .to_owned();
        for (name, price, minutes, qty, hours, deep, super_deep, same_day, multiplier) in extras {
            insert.values_panic([
                name.into(),
                price.into(),
                minutes.into(),
                qty.into(),
                hours.into(),
                deep.into(),
                super_deep.into(),
                same_day.into(),
                multiplier.into(),
                true.into(),
            ]);
        }
        manager.exec_stmt(insert).await?;

        let mut insert = Query::insert()
            .into_table(Subscriptions::Table)
            .columns([
                Subscriptions::Name,
                Subscriptions::DiscountPercentage,
                Subscriptions::SubscriptionDays,
                Subscriptions::IsActive,
            ])
            .to_owned();
        for (name, pct, days) in [("Weekly", 15.0f64, 30), ("Biweekly", 10.0, 30), ("Monthly", 5.0, 30)] {
            insert.values_panic([name.into(), pct.into(), days.into(), true.into()]);
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(Subscriptions::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(ExtraServices::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Services::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(ServiceTypes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ServiceTypes {
    Table,
    Name,
    BasePrice,
    DisplayOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Services {
    Table,
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
enum ExtraServices {
    Table,
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

#[derive(Iden)]
enum Subscriptions {
    Table,
    Name,
    DiscountPercentage,
    SubscriptionDays,
    IsActive,
}
