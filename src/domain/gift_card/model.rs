//! Gift card and its append-only usage ledger

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::shared::{DomainError, DomainResult};

/// Prepaid card. `current_balance` only ever decreases.
#[derive(Debug, Clone)]
pub struct GiftCard {
    pub id: i32,
    pub code: String,
    pub original_amount: Decimal,
    pub current_balance: Decimal,
    pub is_active: bool,
    /// Unpaid cards exist between purchase and payment and cannot be redeemed
    pub is_paid: bool,
    pub purchaser_user_id: Option<String>,
    pub recipient_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One ledger row: a debit made by one order
#[derive(Debug, Clone, PartialEq)]
pub struct GiftCardUsage {
    pub id: i32,
    pub gift_card_id: i32,
    pub order_id: i32,
    pub user_id: String,
    pub amount_used: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub used_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GiftCardValidation {
    pub is_valid: bool,
    pub available_balance: Decimal,
    pub message: String,
}

impl GiftCardValidation {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            available_balance: Decimal::ZERO,
            message: message.into(),
        }
    }
}

/// Existence, active flag, paid flag, positive balance; first failure wins.
pub fn validate_gift_card(card: Option<&GiftCard>) -> GiftCardValidation {
    let Some(card) = card else {
        return GiftCardValidation::invalid("Invalid gift card code");
    };
    if !card.is_active {
        return GiftCardValidation::invalid("Gift card is not active");
    }
    if !card.is_paid {
        return GiftCardValidation::invalid("Gift card has not been paid for");
    }
    if card.current_balance <= Decimal::ZERO {
        return GiftCardValidation::invalid("Gift card has no remaining balance");
    }
    GiftCardValidation {
        is_valid: true,
        available_balance: card.current_balance,
        message: "Gift card is valid".to_string(),
    }
}

impl GiftCard {
    /// Normalized lookup form of a user-entered code
    pub fn normalize(code: &str) -> String {
        code.trim().to_ascii_uppercase()
    }

    /// Amount that would be taken for an order of `order_total`
    pub fn usable_amount(&self, order_total: Decimal) -> Decimal {
        if !self.is_active || !self.is_paid {
            return Decimal::ZERO;
        }
        self.current_balance.min(order_total).max(Decimal::ZERO)
    }

    /// Debit `amount` and return the ledger row describing it.
    ///
    /// Fails without touching the balance if the card cannot cover it.
    pub fn debit(
        &mut self,
        amount: Decimal,
        order_id: i32,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<GiftCardUsage> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::Validation(
                "Gift card debit must be positive".into(),
            ));
        }
        if amount > self.current_balance {
            return Err(DomainError::Conflict(format!(
                "Gift card {} balance {} cannot cover {}",
                self.code, self.current_balance, amount
            )));
        }
        let balance_before = self.current_balance;
        self.current_balance -= amount;
        self.updated_at = now;
        Ok(GiftCardUsage {
            id: 0,
            gift_card_id: self.id,
            order_id,
            user_id: user_id.to_string(),
            amount_used: amount,
            balance_before,
            balance_after: self.current_balance,
            used_at: now,
        })
    }

    /// `current_balance == original_amount − Σ amount_used`
    pub fn ledger_is_consistent(&self, usages: &[GiftCardUsage]) -> bool {
        let spent: Decimal = usages.iter().map(|u| u.amount_used).sum();
        self.current_balance >= Decimal::ZERO && self.original_amount - spent == self.current_balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> GiftCard {
        let now = Utc::now();
        GiftCard {
            id: 1,
            code: "ABCD-EFGH-2345".into(),
            original_amount: Decimal::new(100, 0),
            current_balance: Decimal::new(100, 0),
            is_active: true,
            is_paid: true,
            purchaser_user_id: None,
            recipient_email: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn validation_order() {
        assert!(!validate_gift_card(None).is_valid);

        let mut card = sample_card();
        card.is_paid = false;
        assert_eq!(
            validate_gift_card(Some(&card)).message,
            "Gift card has not been paid for"
        );

        let mut card = sample_card();
        card.current_balance = Decimal::ZERO;
        assert!(!validate_gift_card(Some(&card)).is_valid);

        let v = validate_gift_card(Some(&sample_card()));
        assert!(v.is_valid);
        assert_eq!(v.available_balance, Decimal::new(100, 0));
    }

    #[test]
    fn usable_amount_is_clamped() {
        let card = sample_card();
        assert_eq!(card.usable_amount(Decimal::new(4250, 2)), Decimal::new(4250, 2));
        assert_eq!(card.usable_amount(Decimal::new(500, 0)), Decimal::new(100, 0));
    }

    #[test]
    fn debits_keep_ledger_consistent() {
        let mut card = sample_card();
        let now = Utc::now();
        let first = card.debit(Decimal::new(60, 0), 10, "u1", now).unwrap();
        let second = card.debit(Decimal::new(40, 0), 11, "u2", now).unwrap();
        assert_eq!(first.balance_after, Decimal::new(40, 0));
        assert_eq!(second.balance_before - second.amount_used, second.balance_after);
        assert_eq!(card.current_balance, Decimal::ZERO);
        assert!(card.ledger_is_consistent(&[first, second]));
    }

    #[test]
    fn overdraw_is_rejected_without_side_effects() {
        let mut card = sample_card();
        let err = card.debit(Decimal::new(101, 0), 10, "u1", Utc::now());
        assert!(matches!(err, Err(DomainError::Conflict(_))));
        assert_eq!(card.current_balance, Decimal::new(100, 0));
    }
}
