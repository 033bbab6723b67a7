use thiserror::Error;

use crate::shared::DomainError;

/// States of one booking request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStage {
    Validating,
    Persisting,
    ApplyingGiftCard,
    /// Transaction commit
    Committing,
    /// Subscription effect after commit; its failure never undoes the order
    CommittingSubscription,
    Done,
}

impl BookingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Persisting => "persisting",
            Self::ApplyingGiftCard => "applying_gift_card",
            Self::Committing => "committing",
            Self::CommittingSubscription => "committing_subscription",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for BookingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum BookingError {
    /// Failed validation; no transaction was opened
    #[error("Booking rejected: {0}")]
    Rejected(DomainError),

    /// Consistency failure; the transaction was rolled back
    #[error("Failed to create booking at stage {stage}: {source}")]
    Failed {
        stage: BookingStage,
        source: DomainError,
    },
}

impl BookingError {
    pub fn stage(&self) -> BookingStage {
        match self {
            Self::Rejected(_) => BookingStage::Validating,
            Self::Failed { stage, .. } => *stage,
        }
    }
}
