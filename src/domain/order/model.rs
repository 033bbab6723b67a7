//! Order aggregate root with frozen line-item snapshots

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::shared::{DomainError, DomainResult};

/// Order lifecycle: Pending → Active (paid) → Done, or Cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Active,
    Done,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Done => "Done",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(Self::Pending),
            "Active" => Some(Self::Active),
            "Done" => Some(Self::Done),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceAddress {
    pub address: String,
    pub apt_suite: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Snapshot of one priced service at booking time
#[derive(Debug, Clone, PartialEq)]
pub struct OrderServiceLine {
    pub id: i32,
    pub order_id: i32,
    pub service_id: i32,
    pub service_name: String,
    pub quantity: i32,
    pub cost: Decimal,
    pub duration: i32,
    pub price_multiplier: Decimal,
}

/// Snapshot of one priced extra service at booking time
#[derive(Debug, Clone, PartialEq)]
pub struct OrderExtraServiceLine {
    pub id: i32,
    pub order_id: i32,
    pub extra_service_id: i32,
    pub extra_service_name: String,
    pub quantity: i32,
    pub hours: Decimal,
    pub cost: Decimal,
    pub duration: i32,
    pub price_multiplier: Decimal,
}

/// A priced booking. Monetary fields are immutable once paid.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: i32,
    pub user_id: String,
    pub service_type_id: i32,
    pub service_type_name: String,
    pub contact: ContactInfo,
    pub address: ServiceAddress,
    pub service_date: NaiveDate,
    pub service_time: NaiveTime,
    pub entry_method: Option<String>,
    pub special_instructions: Option<String>,
    pub status: OrderStatus,

    pub sub_total: Decimal,
    pub tax: Decimal,
    pub tips: Decimal,
    pub discount_amount: Decimal,
    pub subscription_discount_amount: Decimal,
    pub gift_card_amount_used: Decimal,
    pub total: Decimal,

    /// Minutes
    pub total_duration: i32,
    pub maids_count: i32,

    pub promo_code: Option<String>,
    pub promo_code_id: Option<i32>,
    pub gift_card_code: Option<String>,
    pub subscription_id: Option<i32>,

    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub services: Vec<OrderServiceLine>,
    pub extra_services: Vec<OrderExtraServiceLine>,
}

impl Order {
    /// Simulated payment capture: Pending → Active.
    pub fn mark_paid(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.is_paid {
            return Err(DomainError::Conflict(format!(
                "Order {} is already paid",
                self.id
            )));
        }
        if self.status != OrderStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "Order {} cannot be paid in status {}",
                self.id, self.status
            )));
        }
        self.is_paid = true;
        self.paid_at = Some(now);
        self.status = OrderStatus::Active;
        self.updated_at = now;
        Ok(())
    }

    pub fn cancel(&mut self, reason: impl Into<String>, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::Conflict(format!(
                "Order {} is already {}",
                self.id, self.status
            )));
        }
        self.status = OrderStatus::Cancelled;
        self.cancellation_reason = Some(reason.into());
        self.updated_at = now;
        Ok(())
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != OrderStatus::Active {
            return Err(DomainError::Conflict(format!(
                "Only active orders can be completed (order {} is {})",
                self.id, self.status
            )));
        }
        self.status = OrderStatus::Done;
        self.updated_at = now;
        Ok(())
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
