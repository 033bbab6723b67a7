//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use super::db_err;
use crate::domain::user::{User, UserRepository, UserRole};
use crate::infrastructure::database::entities::user;
use crate::shared::{DomainError, DomainResult};

// ── Conversion helpers ──────────────────────────────────────────

fn role_to_domain(r: user::UserRole) -> UserRole {
    match r {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Customer => UserRole::Customer,
    }
}

fn entity_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        email: m.email,
        first_name: m.first_name,
        last_name: m.last_name,
        role: role_to_domain(m.role),
        is_active: m.is_active,
        subscription_id: m.subscription_id,
        subscription_start_date: m.subscription_start_date,
        subscription_expiry_date: m.subscription_expiry_date,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

// ── SeaOrmUserRepository ────────────────────────────────────────

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn update_subscription_state(&self, u: &User) -> DomainResult<()> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::SubscriptionId, Expr::value(u.subscription_id))
            .col_expr(
                user::Column::SubscriptionStartDate,
                Expr::value(u.subscription_start_date),
            )
            .col_expr(
                user::Column::SubscriptionExpiryDate,
                Expr::value(u.subscription_expiry_date),
            )
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(u.id.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", "id", &u.id));
        }
        Ok(())
    }
}
