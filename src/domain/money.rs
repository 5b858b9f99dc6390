use crate::error::{OrchestratorError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Number of decimal places shown for settlement figures.
pub const DISPLAY_SCALE: u32 = 2;

/// Rounds a monetary value to [`DISPLAY_SCALE`] places, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Represents a positive declared amount for a transaction.
///
/// Ensures that transaction amounts are always positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(OrchestratorError::Validation(format!(
                "Amount must be positive, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = OrchestratorError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Final figures of a settled transaction.
///
/// `gross` and `fee` are rounded independently with [`round_money`]; `net` is
/// the exact difference of the rounded figures, so `net == gross - fee` holds
/// for every displayed result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    /// Declared amount, in the origin currency.
    pub amount: Decimal,
    pub gross: Decimal,
    /// Platform spread retained.
    pub fee: Decimal,
    pub net: Decimal,
    pub exchange_rate: Decimal,
}

impl Settlement {
    /// Computes `gross = amount * rate`, `fee = gross * spread` and
    /// `net = gross - fee`.
    ///
    /// Fails with [`OrchestratorError::Settlement`] if any product overflows.
    pub fn compute(amount: Decimal, exchange_rate: Decimal, spread: Decimal) -> Result<Self> {
        let gross = amount
            .checked_mul(exchange_rate)
            .map(round_money)
            .ok_or_else(|| {
                OrchestratorError::Settlement(format!(
                    "gross amount overflows for {amount} at rate {exchange_rate}"
                ))
            })?;
        let fee = gross.checked_mul(spread).map(round_money).ok_or_else(|| {
            OrchestratorError::Settlement(format!("fee overflows for gross {gross}"))
        })?;
        let net = gross.checked_sub(fee).ok_or_else(|| {
            OrchestratorError::Settlement(format!("net amount overflows for gross {gross}"))
        })?;

        Ok(Self {
            amount,
            gross,
            fee,
            net,
            exchange_rate,
        })
    }
}
