use chrono::{DateTime, Duration, Utc};

use crate::domain::subscription::Subscription;
use crate::shared::{DomainError, DomainResult};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::Customer,
        }
    }
}

/// User with the subscription state the booking flow maintains
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub subscription_id: Option<i32>,
    pub subscription_start_date: Option<DateTime<Utc>>,
    pub subscription_expiry_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_active_subscription(&self, now: DateTime<Utc>) -> bool {
        self.subscription_id.is_some()
            && self.subscription_expiry_date.is_some_and(|expiry| expiry > now)
    }

    /// Drop a lapsed subscription reference. Returns true if state changed.
    pub fn clear_expired_subscription(&mut self, now: DateTime<Utc>) -> bool {
        if self.subscription_id.is_some() && !self.has_active_subscription(now) {
            self.subscription_id = None;
            self.subscription_start_date = None;
            self.subscription_expiry_date = None;
            self.updated_at = now;
            return true;
        }
        false
    }

    /// Start a fresh window for `plan` at `now`.
    pub fn activate_subscription(&mut self, plan: &Subscription, now: DateTime<Utc>) -> DomainResult<()> {
        if !plan.grants_window() {
            return Err(DomainError::Validation(format!(
                "Subscription '{}' has no validity window",
                plan.name
            )));
        }
        self.subscription_id = Some(plan.id);
        self.subscription_start_date = Some(now);
        self.subscription_expiry_date = Some(now + Duration::days(plan.subscription_days as i64));
        self.updated_at = now;
        Ok(())
    }

    /// Extend the current window by the plan's days, starting from the
    /// later of `now` and the current expiry.
    pub fn renew_subscription(&mut self, plan: &Subscription, now: DateTime<Utc>) -> DomainResult<()> {
        if self.subscription_id != Some(plan.id) {
            return Err(DomainError::Conflict(format!(
                "User {} is not subscribed to plan {}",
                self.id, plan.id
            )));
        }
        if !plan.grants_window() {
            return Err(DomainError::Validation(format!(
                "Subscription '{}' has no validity window",
                plan.name
            )));
        }
        let base = self
            .subscription_expiry_date
            .filter(|expiry| *expiry > now)
            .unwrap_or(now);
        self.subscription_expiry_date = Some(base + Duration::days(plan.subscription_days as i64));
        if self.subscription_start_date.is_none() {
            self.subscription_start_date = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: "user-1".into(),
            email: "jane@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            role: UserRole::Customer,
            is_active: true,
            subscription_id: None,
            subscription_start_date: None,
            subscription_expiry_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn monthly() -> Subscription {
        Subscription {
            id: 2,
            name: "Monthly".into(),
            discount_percentage: rust_decimal::Decimal::new(10, 0),
            subscription_days: 30,
            is_active: true,
        }
    }

    #[test]
    fn activate_then_renew_extends_from_expiry() {
        let now = Utc::now();
        let mut user = sample_user();
        user.activate_subscription(&monthly(), now).unwrap();
        assert!(user.has_active_subscription(now));
        assert_eq!(user.subscription_expiry_date, Some(now + Duration::days(30)));

        user.renew_subscription(&monthly(), now).unwrap();
        assert_eq!(user.subscription_expiry_date, Some(now + Duration::days(60)));
    }

    #[test]
    fn renew_after_lapse_starts_from_now() {
        let now = Utc::now();
        let mut user = sample_user();
        user.subscription_id = Some(2);
        user.subscription_expiry_date = Some(now - Duration::days(3));
        user.renew_subscription(&monthly(), now).unwrap();
        assert_eq!(user.subscription_expiry_date, Some(now + Duration::days(30)));
    }

    #[test]
    fn expired_reference_is_cleared() {
        let now = Utc::now();
        let mut user = sample_user();
        user.subscription_id = Some(2);
        user.subscription_expiry_date = Some(now - Duration::days(1));
        assert!(!user.has_active_subscription(now));
        assert!(user.clear_expired_subscription(now));
        assert!(user.subscription_id.is_none());
        assert!(!user.clear_expired_subscription(now));
    }

    #[test]
    fn zero_day_plan_cannot_activate() {
        let mut plan = monthly();
        plan.subscription_days = 0;
        assert!(sample_user().activate_subscription(&plan, Utc::now()).is_err());
    }
}
