use super::money::{Amount, Money};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Card details forwarded to the payment gateway.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct CardCredentials {
    pub holder_name: String,
    pub card_number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: String,
}

impl CardCredentials {
    /// Checks that every field is present and the expiry month is in range.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("holder name", &self.holder_name),
            ("card number", &self.card_number),
            ("cvc", &self.cvc),
        ] {
            if value.trim().is_empty() {
                return Err(LedgerError::InvalidArgument(format!(
                    "{field} must not be empty"
                )));
            }
        }
        if !(1..=12).contains(&self.exp_month) {
            return Err(LedgerError::InvalidArgument(format!(
                "expiry month must be between 1 and 12, got {}",
                self.exp_month
            )));
        }
        Ok(())
    }
}

/// What a gateway answered for one authorization request.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Authorization {
    pub approved: bool,
    pub reference: Option<String>,
}

impl Authorization {
    pub fn approved(reference: impl Into<String>) -> Self {
        Self {
            approved: true,
            reference: Some(reference.into()),
        }
    }

    pub fn declined() -> Self {
        Self {
            approved: false,
            reference: None,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum DeclineReason {
    /// The requested amount was above the remaining balance. The gateway was not called.
    OverpaymentRejected,
    /// The gateway declined, failed or timed out.
    GatewayDeclined,
}

/// Outcome of a payment attempt that passed input validation.
///
/// Declines are regular results, not errors, so callers can tell a bad request
/// from a valid payment that was not taken.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PaymentResult {
    Accepted {
        reference: String,
        remaining_balance: Money,
    },
    Declined {
        reason: DeclineReason,
        remaining_balance: Money,
    },
}

impl PaymentResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PaymentResult::Accepted { .. })
    }

    pub fn remaining_balance(&self) -> Money {
        match self {
            PaymentResult::Accepted {
                remaining_balance, ..
            }
            | PaymentResult::Declined {
                remaining_balance, ..
            } => *remaining_balance,
        }
    }

    pub fn decline_reason(&self) -> Option<DeclineReason> {
        match self {
            PaymentResult::Declined { reason, .. } => Some(*reason),
            PaymentResult::Accepted { .. } => None,
        }
    }
}

/// One accepted payment as recorded in the settlement log.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct SettlementEntry {
    pub table_id: String,
    pub amount: Amount,
    pub reference: String,
    pub settled_at: DateTime<Utc>,
}
