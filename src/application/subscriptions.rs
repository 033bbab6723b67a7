//! Subscription manager
//!
//! Maintains the user's subscription window. Called only after a booking
//! has committed; its failures never undo the booking.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::user::User;
use crate::domain::RepositoryProvider;
use crate::shared::{DomainError, DomainResult};

/// What happened to the user's subscription after a booking or payment
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionEffect {
    Activated {
        subscription_id: i32,
        expiry_date: DateTime<Utc>,
    },
    Renewed {
        subscription_id: i32,
        expiry_date: DateTime<Utc>,
    },
    Skipped(String),
    Failed(String),
}

impl SubscriptionEffect {
    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

pub struct SubscriptionManager {
    repos: Arc<dyn RepositoryProvider>,
}

impl SubscriptionManager {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn load_user(&self, user_id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))
    }

    /// Whether the user has a live subscription; clears a lapsed one.
    pub async fn check_and_update_status(&self, user_id: &str) -> DomainResult<bool> {
        let mut user = self.load_user(user_id).await?;
        let now = Utc::now();
        if user.clear_expired_subscription(now) {
            self.repos.users().update_subscription_state(&user).await?;
            info!(user_id, "Expired subscription cleared");
        }
        Ok(user.has_active_subscription(now))
    }

    pub async fn activate(&self, user_id: &str, subscription_id: i32) -> DomainResult<User> {
        let plan = self
            .repos
            .subscriptions()
            .find_by_id(subscription_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subscription", "id", subscription_id))?;
        let mut user = self.load_user(user_id).await?;
        user.activate_subscription(&plan, Utc::now())?;
        self.repos.users().update_subscription_state(&user).await?;
        info!(user_id, subscription_id, expiry = ?user.subscription_expiry_date, "Subscription activated");
        Ok(user)
    }

    /// Extend the user's current plan by its validity window
    pub async fn renew(&self, user_id: &str) -> DomainResult<User> {
        let mut user = self.load_user(user_id).await?;
        let subscription_id = user.subscription_id.ok_or_else(|| {
            DomainError::Conflict(format!("User {} has no subscription to renew", user_id))
        })?;
        let plan = self
            .repos
            .subscriptions()
            .find_by_id(subscription_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Subscription", "id", subscription_id))?;
        user.renew_subscription(&plan, Utc::now())?;
        self.repos.users().update_subscription_state(&user).await?;
        info!(user_id, subscription_id, expiry = ?user.subscription_expiry_date, "Subscription renewed");
        Ok(user)
    }

    /// Post-booking effect: activate if the user has none, otherwise renew.
    pub async fn apply_after_booking(&self, user_id: &str, subscription_id: i32) -> SubscriptionEffect {
        self.run(user_id, subscription_id, true).await
    }

    /// Post-payment effect: activate only if the user has none.
    pub async fn ensure_active(&self, user_id: &str, subscription_id: i32) -> SubscriptionEffect {
        self.run(user_id, subscription_id, false).await
    }

    async fn run(&self, user_id: &str, subscription_id: i32, renew_existing: bool) -> SubscriptionEffect {
        match self.try_run(user_id, subscription_id, renew_existing).await {
            Ok(effect) => effect,
            Err(e) => SubscriptionEffect::Failed(e.to_string()),
        }
    }

    async fn try_run(
        &self,
        user_id: &str,
        subscription_id: i32,
        renew_existing: bool,
    ) -> DomainResult<SubscriptionEffect> {
        let plan = self.repos.subscriptions().find_by_id(subscription_id).await?;
        let Some(plan) = plan.filter(|p| p.grants_window()) else {
            return Ok(SubscriptionEffect::Skipped(format!(
                "Subscription {} has no validity window",
                subscription_id
            )));
        };

        if !self.check_and_update_status(user_id).await? {
            let user = self.activate(user_id, plan.id).await?;
            return Ok(SubscriptionEffect::Activated {
                subscription_id: plan.id,
                expiry_date: user.subscription_expiry_date.unwrap_or_else(Utc::now),
            });
        }

        if !renew_existing {
            return Ok(SubscriptionEffect::Skipped(
                "Subscription already active".to_string(),
            ));
        }

        let user = self.renew(user_id).await?;
        Ok(SubscriptionEffect::Renewed {
            subscription_id: user.subscription_id.unwrap_or(plan.id),
            expiry_date: user.subscription_expiry_date.unwrap_or_else(Utc::now),
        })
    }
}
