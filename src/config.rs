//! Simulation configuration.
//!
//! # Environment Variables
//!
//! - `SETTLEMENT_EXCHANGE_RATE`: exchange rate applied to declared amounts (default: `5.00`)
//! - `SETTLEMENT_SPREAD`: platform spread as a fraction of the gross amount (default: `0.01`)
//! - `SETTLEMENT_DELAY_SCALE`: factor applied to every step delay; `0` disables waiting (default: `1`)
//! - `SETTLEMENT_BRAND`: name used in outbound notifications (default: `CryptoFlow`)
//!
//! # Invariants
//!
//! - `exchange_rate` is strictly positive
//! - `spread` is in `[0, 1)`

use crate::domain::pipeline::{Pipeline, STEP_COUNT};
use crate::error::{OrchestratorError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_EXCHANGE_RATE: &str = "SETTLEMENT_EXCHANGE_RATE";
pub const ENV_SPREAD: &str = "SETTLEMENT_SPREAD";
pub const ENV_DELAY_SCALE: &str = "SETTLEMENT_DELAY_SCALE";
pub const ENV_BRAND: &str = "SETTLEMENT_BRAND";

/// Step delays in milliseconds, in pipeline order.
const DEFAULT_STEP_DELAYS_MS: [u64; STEP_COUNT] = [1500, 1800, 1500, 1200, 1500, 1000];

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub exchange_rate: Decimal,
    pub spread: Decimal,
    pub step_delays: [Duration; STEP_COUNT],
    pub brand: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            exchange_rate: dec!(5.00),
            spread: dec!(0.01),
            step_delays: DEFAULT_STEP_DELAYS_MS.map(Duration::from_millis),
            brand: "CryptoFlow".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    ///
    /// Unset variables fall back to the defaults; set but invalid ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_EXCHANGE_RATE) {
            config.exchange_rate = parse_decimal(ENV_EXCHANGE_RATE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SPREAD) {
            config.spread = parse_decimal(ENV_SPREAD, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DELAY_SCALE) {
            let scale = parse_decimal(ENV_DELAY_SCALE, &raw)?;
            config = config.with_delay_scale(scale)?;
        }
        if let Some(brand) = lookup(ENV_BRAND) {
            config.brand = brand;
        }

        config.validate()?;
        Ok(config)
    }

    /// Multiplies every step delay by `scale`.
    pub fn with_delay_scale(mut self, scale: Decimal) -> Result<Self> {
        let factor = scale
            .to_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .ok_or_else(|| invalid(ENV_DELAY_SCALE, "must be a non-negative number"))?;
        let mut scaled = self.step_delays;
        for (slot, delay) in scaled.iter_mut().zip(self.step_delays) {
            *slot = Duration::try_from_secs_f64(delay.as_secs_f64() * factor)
                .map_err(|_| invalid(ENV_DELAY_SCALE, "scaled step delay is out of range"))?;
        }
        self.step_delays = scaled;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.exchange_rate <= Decimal::ZERO {
            return Err(invalid(ENV_EXCHANGE_RATE, "must be greater than zero"));
        }
        if self.spread < Decimal::ZERO || self.spread >= Decimal::ONE {
            return Err(invalid(ENV_SPREAD, "must be in [0, 1)"));
        }
        Ok(())
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.exchange_rate, self.spread, self.step_delays)
    }
}

fn parse_decimal(name: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| invalid(name, &e.to_string()))
}

fn invalid(name: &str, message: &str) -> OrchestratorError {
    OrchestratorError::Config {
        name: name.to_string(),
        message: message.to_string(),
    }
}
