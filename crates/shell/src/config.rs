//! Shell configuration (environment variables).

use core::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

pub const DEPOSIT_AMOUNT_VAR: &str = "CURRENT_ACCOUNT_DEPOSIT_AMOUNT";
pub const WITHDRAW_AMOUNT_VAR: &str = "CURRENT_ACCOUNT_WITHDRAW_AMOUNT";
pub const OVERDRAFT_STEP_VAR: &str = "CURRENT_ACCOUNT_OVERDRAFT_STEP";

const DEFAULT_AMOUNT: i64 = 50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid decimal: {value:?}")]
    InvalidDecimal { var: &'static str, value: String },

    #[error("{var} must be greater than 0, got {value}")]
    NonPositive { var: &'static str, value: Decimal },
}

/// Fixed amounts used by the menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellConfig {
    pub deposit_amount: Decimal,
    pub withdraw_amount: Decimal,
    pub overdraft_step: Decimal,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            deposit_amount: Decimal::from(DEFAULT_AMOUNT),
            withdraw_amount: Decimal::from(DEFAULT_AMOUNT),
            overdraft_step: Decimal::from(DEFAULT_AMOUNT),
        }
    }
}

impl ShellConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from any variable source; unset variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            deposit_amount: read_amount(&lookup, DEPOSIT_AMOUNT_VAR, defaults.deposit_amount)?,
            withdraw_amount: read_amount(&lookup, WITHDRAW_AMOUNT_VAR, defaults.withdraw_amount)?,
            overdraft_step: read_amount(&lookup, OVERDRAFT_STEP_VAR, defaults.overdraft_step)?,
        })
    }
}

fn read_amount(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: Decimal,
) -> Result<Decimal, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };

    let value = Decimal::from_str(raw.trim()).map_err(|_| ConfigError::InvalidDecimal {
        var,
        value: raw.clone(),
    })?;
    if value <= Decimal::ZERO {
        return Err(ConfigError::NonPositive { var, value });
    }
    Ok(value)
}
