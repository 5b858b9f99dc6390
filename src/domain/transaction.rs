use super::money::Amount;
use crate::error::OrchestratorError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of generated transaction identifiers, in hex characters.
pub const ID_LEN: usize = 8;

/// Opaque transaction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generates a fresh identifier from the leading hex digits of a random UUID.
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(ID_LEN);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TransactionId {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(OrchestratorError::Validation(format!(
                "invalid transaction id: {s:?}"
            )));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionStatus {
    #[serde(rename = "awaiting funds")]
    AwaitingFunds,
    #[serde(rename = "settling")]
    Settling,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingFunds => f.write_str("awaiting funds"),
            Self::Settling => f.write_str("settling"),
        }
    }
}

/// A pending transfer waiting for its simulated settlement.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    /// Address notifications are sent to (e.g. a phone number).
    pub origin: String,
    pub amount: Amount,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(origin: impl Into<String>, amount: Amount) -> Self {
        Self {
            id: TransactionId::generate(),
            origin: origin.into(),
            amount,
            status: TransactionStatus::AwaitingFunds,
            created_at: Utc::now(),
        }
    }

    pub fn masked_origin(&self) -> String {
        mask_origin(&self.origin)
    }
}

/// Partially hides a phone-like origin: `+55 11 9****-1234`.
///
/// References with fewer than ten digits are returned unchanged.
pub fn mask_origin(origin: &str) -> String {
    let digits: String = origin.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 10 {
        return origin.to_string();
    }
    format!(
        "+{} {} {}****-{}",
        &digits[..2],
        &digits[2..4],
        &digits[4..5],
        &digits[digits.len() - 4..]
    )
}
