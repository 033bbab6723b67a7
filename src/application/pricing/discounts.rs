//! Discount stack: promo, subscription, tax, tips, gift card, in that order

use rust_decimal::Decimal;

use super::policy::PricingPolicy;
use crate::domain::promo::PromoCode;
use crate::domain::subscription::Subscription;
use crate::shared::money::{bounded, percent_of, round_money};
use crate::shared::DomainResult;

/// Discount sources already validated for this booking
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscountSources<'a> {
    pub promo: Option<&'a PromoCode>,
    pub subscription: Option<&'a Subscription>,
    /// Balance of a usable gift card
    pub gift_card_balance: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBreakdown {
    pub sub_total: Decimal,
    pub discount_amount: Decimal,
    pub subscription_discount_amount: Decimal,
    pub tax: Decimal,
    pub tips: Decimal,
    pub total_before_gift_card: Decimal,
    pub gift_card_amount_used: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Replace the planned gift card amount with what the ledger actually debited
    pub fn with_gift_card_used(mut self, used: Decimal) -> Self {
        let used = round_money(used.max(Decimal::ZERO).min(self.total_before_gift_card));
        self.gift_card_amount_used = used;
        self.total = self.total_before_gift_card - used;
        self
    }
}

/// Fails only when the subtotal or tips lie outside the supported money range.
pub fn resolve_discounts(
    sub_total: Decimal,
    tips: Decimal,
    sources: DiscountSources<'_>,
    policy: &PricingPolicy,
) -> DomainResult<PriceBreakdown> {
    let sub_total = bounded(Some(round_money(sub_total)), "Subtotal")?;
    let tips = bounded(Some(round_money(tips.max(Decimal::ZERO))), "Tips")?;

    let discount_amount = sources
        .promo
        .map(|p| p.discount_for(sub_total))
        .unwrap_or(Decimal::ZERO);

    let subscription_discount_amount = sources
        .subscription
        .map(|s| {
            percent_of(sub_total, s.discount_percentage)
                .max(Decimal::ZERO)
                .min(sub_total)
        })
        .unwrap_or(Decimal::ZERO);

    let taxable = (sub_total - discount_amount - subscription_discount_amount).max(Decimal::ZERO);
    let tax = round_money(taxable * policy.sales_tax_rate);
    let total_before_gift_card = taxable + tax + tips;

    let gift_card_amount_used = sources
        .gift_card_balance
        .map(|balance| balance.max(Decimal::ZERO).min(total_before_gift_card))
        .map(round_money)
        .unwrap_or(Decimal::ZERO);

    Ok(PriceBreakdown {
        sub_total,
        discount_amount,
        subscription_discount_amount,
        tax,
        tips,
        total_before_gift_card,
        gift_card_amount_used,
        total: total_before_gift_card - gift_card_amount_used,
    })
}
