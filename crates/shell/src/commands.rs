//! Key-bound menu commands.
//!
//! Each command is a plain function from the account (plus the configured
//! amounts) to an [`Outcome`]. The dispatch loop in [`crate::app`] only knows
//! about this table, not about account rules.

use rust_decimal::Decimal;
use thiserror::Error;

use current_account_core::{AggregateRoot, DomainError};
use current_account_domain::{AccountEvent, CurrentAccount};
use current_account_events::Event;

use crate::config::ShellConfig;

pub type Action = fn(&mut CurrentAccount, &ShellConfig) -> Result<Outcome, CommandError>;

/// What a successful command did, formatted for the user by `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Deposited { amount: Decimal, balance: Decimal },
    Withdrew { amount: Decimal, balance: Decimal },
    OverdraftLimitUpdated { limit: Decimal },
    Closed,
    Reopened,
}

impl core::fmt::Display for Outcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Outcome::Quit => write!(f, "Goodbye"),
            Outcome::Deposited { amount, balance } => {
                write!(f, "Deposited {amount}\nNew balance {balance}")
            }
            Outcome::Withdrew { amount, balance } => {
                write!(f, "Withdrew {amount}\nNew balance {balance}")
            }
            Outcome::OverdraftLimitUpdated { limit } => {
                write!(f, "Overdraft limit updated to {limit}")
            }
            Outcome::Closed => write!(f, "Closed bank account"),
            Outcome::Reopened => write!(f, "Re-opened bank account"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    /// The account refused the operation. Shown as-is and the session goes on.
    #[error(transparent)]
    Rejected(DomainError),

    /// Anything else: shown distinctly, the session still goes on.
    #[error("Command caused an exception: {0:#}")]
    Failed(anyhow::Error),
}

impl From<DomainError> for CommandError {
    fn from(err: DomainError) -> Self {
        if err.is_invalid_operation() {
            Self::Rejected(err)
        } else {
            Self::Failed(anyhow::Error::new(err))
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellCommand {
    pub key: char,
    pub prompt: String,
    pub action: Action,
}

/// Ordered key → command mapping, matched case-insensitively.
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: Vec<ShellCommand>,
}

impl CommandTable {
    /// The menu: quit, deposit, withdraw, raise/lower overdraft, close, reopen.
    pub fn standard(config: &ShellConfig) -> Self {
        let command = |key, prompt: String, action: Action| ShellCommand {
            key,
            prompt,
            action,
        };

        Self {
            commands: vec![
                command('Q', "Quit application".to_string(), quit),
                command('D', format!("Deposit {}", config.deposit_amount), deposit),
                command('W', format!("Withdraw {}", config.withdraw_amount), withdraw),
                command(
                    'I',
                    format!("Increase overdraft by {}", config.overdraft_step),
                    increase_overdraft,
                ),
                command(
                    'L',
                    format!("Decrease overdraft by {}", config.overdraft_step),
                    decrease_overdraft,
                ),
                command('C', "Close account".to_string(), close),
                command('R', "Re-open account".to_string(), reopen),
            ],
        }
    }

    /// Find the command bound to `input`, ignoring case and surrounding whitespace.
    pub fn lookup(&self, input: &str) -> Option<&ShellCommand> {
        let mut chars = input.trim().chars();
        let key = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        self.commands
            .iter()
            .find(|cmd| cmd.key.eq_ignore_ascii_case(&key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShellCommand> {
        self.commands.iter()
    }
}

fn applied(account: &CurrentAccount, event: &AccountEvent) {
    tracing::debug!(
        account_id = %account.id_typed(),
        event_type = event.event_type(),
        schema_version = event.version(),
        occurred_at = %event.occurred_at(),
        version = account.version(),
        "event applied"
    );
}

fn quit(_: &mut CurrentAccount, _: &ShellConfig) -> Result<Outcome, CommandError> {
    Ok(Outcome::Quit)
}

fn deposit(account: &mut CurrentAccount, config: &ShellConfig) -> Result<Outcome, CommandError> {
    let event = account.deposit_funds(config.deposit_amount)?;
    applied(account, &event);
    Ok(Outcome::Deposited {
        amount: config.deposit_amount,
        balance: account.balance(),
    })
}

fn withdraw(account: &mut CurrentAccount, config: &ShellConfig) -> Result<Outcome, CommandError> {
    let event = account.withdraw_funds(config.withdraw_amount)?;
    applied(account, &event);
    Ok(Outcome::Withdrew {
        amount: config.withdraw_amount,
        balance: account.balance(),
    })
}

fn increase_overdraft(
    account: &mut CurrentAccount,
    config: &ShellConfig,
) -> Result<Outcome, CommandError> {
    let current = account.overdraft_limit();
    let limit = current.checked_add(config.overdraft_step).ok_or_else(|| {
        CommandError::Failed(anyhow::anyhow!("overdraft limit {current} is too large to increase"))
    })?;
    set_overdraft(account, limit)
}

fn decrease_overdraft(
    account: &mut CurrentAccount,
    config: &ShellConfig,
) -> Result<Outcome, CommandError> {
    let limit = account.overdraft_limit() - config.overdraft_step;
    set_overdraft(account, limit)
}

fn set_overdraft(account: &mut CurrentAccount, limit: Decimal) -> Result<Outcome, CommandError> {
    let event = account.update_overdraft_limit(limit)?;
    applied(account, &event);
    Ok(Outcome::OverdraftLimitUpdated {
        limit: account.overdraft_limit(),
    })
}

fn close(account: &mut CurrentAccount, _: &ShellConfig) -> Result<Outcome, CommandError> {
    let event = account.close()?;
    applied(account, &event);
    Ok(Outcome::Closed)
}

fn reopen(account: &mut CurrentAccount, _: &ShellConfig) -> Result<Outcome, CommandError> {
    let event = account.reopen()?;
    applied(account, &event);
    Ok(Outcome::Reopened)
}
