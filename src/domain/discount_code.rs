//! Classification of the client's discount code field
//!
//! A single request field may carry either a promo code or a gift card
//! code. It is resolved once at the boundary into [`DiscountCode`] so the
//! pricing pipeline never pattern-matches strings.

use crate::shared::{DomainError, DomainResult};

const GIFT_CARD_GROUPS: usize = 3;
const GIFT_CARD_GROUP_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountCode {
    Promo(String),
    GiftCard(String),
}

/// `XXXX-XXXX-XXXX`, ASCII alphanumeric groups
pub fn is_gift_card_code(code: &str) -> bool {
    let groups: Vec<&str> = code.split('-').collect();
    groups.len() == GIFT_CARD_GROUPS
        && groups.iter().all(|g| {
            g.len() == GIFT_CARD_GROUP_LEN && g.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

impl DiscountCode {
    /// Classify a code entered in the generic code field.
    /// Blank input is no code at all.
    pub fn classify(raw: &str) -> Option<Self> {
        let code = raw.trim().to_ascii_uppercase();
        if code.is_empty() {
            None
        } else if is_gift_card_code(&code) {
            Some(Self::GiftCard(code))
        } else {
            Some(Self::Promo(code))
        }
    }

    /// Resolve the promo field and the explicit gift card field.
    ///
    /// A gift-card-shaped promo code is a gift card. Supplying both
    /// fields is rejected.
    pub fn from_fields(promo: Option<&str>, gift_card: Option<&str>) -> DomainResult<Option<Self>> {
        let promo = promo.and_then(Self::classify);
        let gift_card = gift_card
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .map(Self::GiftCard);

        match (promo, gift_card) {
            (Some(_), Some(_)) => Err(DomainError::Validation(
                "A promo code and a gift card cannot be used on the same order".into(),
            )),
            (code, None) | (None, code) => Ok(code),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Promo(c) | Self::GiftCard(c) => c,
        }
    }

    pub fn promo(&self) -> Option<&str> {
        match self {
            Self::Promo(c) => Some(c),
            Self::GiftCard(_) => None,
        }
    }

    pub fn gift_card(&self) -> Option<&str> {
        match self {
            Self::GiftCard(c) => Some(c),
            Self::Promo(_) => None,
        }
    }
}
