//! The fixed settlement pipeline: six ordered steps followed by the
//! settlement computation.

use super::money::Settlement;
use crate::error::Result;
use rust_decimal::Decimal;
use std::time::Duration;

pub const STEP_COUNT: usize = 6;

/// One stage of the pipeline: the log line it emits and how long it takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub message: String,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Vec<Step>,
    exchange_rate: Decimal,
    spread: Decimal,
}

impl Pipeline {
    /// Builds the pipeline for the given rate and spread fraction.
    ///
    /// `delays[i]` is the wait before step `i` is logged.
    pub fn new(exchange_rate: Decimal, spread: Decimal, delays: [Duration; STEP_COUNT]) -> Self {
        let spread_pct = (spread * Decimal::ONE_HUNDRED).normalize();
        let messages = [
            "[BLOCKCHAIN] Webhook received: stablecoin detected on network.".to_string(),
            "[COMPLIANCE] Identity and sanctions check: APPROVED.".to_string(),
            format!("[FX ENGINE] Exchange rate locked at {exchange_rate:.2}."),
            format!("[UNIT ECONOMICS] Retaining platform spread ({spread_pct}%)."),
            "[SETTLEMENT RAIL] Preparing instant transfer...".to_string(),
            "[SETTLEMENT RAIL] Transfer completed.".to_string(),
        ];

        let steps = messages
            .into_iter()
            .zip(delays)
            .map(|(message, delay)| Step { message, delay })
            .collect();

        Self {
            steps,
            exchange_rate,
            spread,
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn messages(&self) -> Vec<String> {
        self.steps.iter().map(|step| step.message.clone()).collect()
    }

    pub fn exchange_rate(&self) -> Decimal {
        self.exchange_rate
    }

    pub fn spread(&self) -> Decimal {
        self.spread
    }

    pub fn settle(&self, amount: Decimal) -> Result<Settlement> {
        Settlement::compute(amount, self.exchange_rate, self.spread)
    }
}
