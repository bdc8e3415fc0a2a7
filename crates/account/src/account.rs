use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use current_account_core::{
    AccountId, Aggregate, AggregateRoot, DomainError, DomainResult, InvalidOperation,
};
use current_account_events::{Command, Event, execute};

use crate::overdraft::OverdraftLimit;

/// Aggregate root: CurrentAccount.
///
/// State can only change through the operations below; every one of them
/// either succeeds and applies exactly one event, or fails and leaves the
/// account untouched. For every reachable state `balance >= -overdraft_limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAccount {
    id: AccountId,
    is_open: bool,
    balance: Decimal,
    overdraft: OverdraftLimit,
    version: u64,
}

impl CurrentAccount {
    /// Open a new account with a fresh identity, zero balance and no overdraft.
    pub fn open() -> Self {
        Self::open_with_id(AccountId::default())
    }

    pub fn open_with_id(id: AccountId) -> Self {
        let mut account = Self::blank(id);
        account.apply(&AccountEvent::AccountOpened(AccountOpened {
            account_id: id,
            occurred_at: Utc::now(),
        }));
        account
    }

    fn blank(id: AccountId) -> Self {
        Self {
            id,
            is_open: false,
            balance: Decimal::ZERO,
            overdraft: OverdraftLimit::ZERO,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Overdraft limit as a non-negative magnitude.
    pub fn overdraft_limit(&self) -> Decimal {
        self.overdraft.magnitude()
    }

    pub fn overdraft(&self) -> OverdraftLimit {
        self.overdraft
    }

    pub fn deposit_funds(&mut self, amount: Decimal) -> DomainResult<AccountEvent> {
        self.execute_one(AccountCommand::DepositFunds(DepositFunds {
            account_id: self.id,
            amount,
            occurred_at: Utc::now(),
        }))
    }

    pub fn withdraw_funds(&mut self, amount: Decimal) -> DomainResult<AccountEvent> {
        self.execute_one(AccountCommand::WithdrawFunds(WithdrawFunds {
            account_id: self.id,
            amount,
            occurred_at: Utc::now(),
        }))
    }

    pub fn update_overdraft_limit(&mut self, limit: Decimal) -> DomainResult<AccountEvent> {
        self.execute_one(AccountCommand::UpdateOverdraftLimit(UpdateOverdraftLimit {
            account_id: self.id,
            limit,
            occurred_at: Utc::now(),
        }))
    }

    pub fn close(&mut self) -> DomainResult<AccountEvent> {
        self.execute_one(AccountCommand::Close(CloseAccount {
            account_id: self.id,
            occurred_at: Utc::now(),
        }))
    }

    pub fn reopen(&mut self) -> DomainResult<AccountEvent> {
        self.execute_one(AccountCommand::ReOpen(ReopenAccount {
            account_id: self.id,
            occurred_at: Utc::now(),
        }))
    }

    /// Decide and apply an arbitrary command.
    pub fn execute(&mut self, command: &AccountCommand) -> DomainResult<Vec<AccountEvent>> {
        execute(self, command)
    }

    fn execute_one(&mut self, command: AccountCommand) -> DomainResult<AccountEvent> {
        execute(self, &command)?
            .pop()
            .ok_or_else(|| DomainError::invariant("command produced no event"))
    }
}

impl AggregateRoot for CurrentAccount {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: DepositFunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositFunds {
    pub account_id: AccountId,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Command: WithdrawFunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawFunds {
    pub account_id: AccountId,
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateOverdraftLimit.
///
/// `limit` is the requested magnitude. It is a raw decimal so that negative
/// requests reach the aggregate and get rejected there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOverdraftLimit {
    pub account_id: AccountId,
    pub limit: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CloseAccount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseAccount {
    pub account_id: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReopenAccount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReopenAccount {
    pub account_id: AccountId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountCommand {
    DepositFunds(DepositFunds),
    WithdrawFunds(WithdrawFunds),
    UpdateOverdraftLimit(UpdateOverdraftLimit),
    Close(CloseAccount),
    ReOpen(ReopenAccount),
}

impl Command for AccountCommand {
    fn target_account_id(&self) -> AccountId {
        match self {
            AccountCommand::DepositFunds(c) => c.account_id,
            AccountCommand::WithdrawFunds(c) => c.account_id,
            AccountCommand::UpdateOverdraftLimit(c) => c.account_id,
            AccountCommand::Close(c) => c.account_id,
            AccountCommand::ReOpen(c) => c.account_id,
        }
    }
}

/// Event: AccountOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOpened {
    pub account_id: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FundsDeposited. `balance` is the balance after the deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsDeposited {
    pub account_id: AccountId,
    pub amount: Decimal,
    pub balance: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FundsWithdrawn. `balance` is the balance after the withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsWithdrawn {
    pub account_id: AccountId,
    pub amount: Decimal,
    pub balance: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OverdraftLimitUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdraftLimitUpdated {
    pub account_id: AccountId,
    pub limit: OverdraftLimit,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AccountClosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClosed {
    pub account_id: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AccountReopened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReopened {
    pub account_id: AccountId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountEvent {
    AccountOpened(AccountOpened),
    FundsDeposited(FundsDeposited),
    FundsWithdrawn(FundsWithdrawn),
    OverdraftLimitUpdated(OverdraftLimitUpdated),
    AccountClosed(AccountClosed),
    AccountReopened(AccountReopened),
}

impl Event for AccountEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::AccountOpened(_) => "account.opened",
            AccountEvent::FundsDeposited(_) => "account.funds_deposited",
            AccountEvent::FundsWithdrawn(_) => "account.funds_withdrawn",
            AccountEvent::OverdraftLimitUpdated(_) => "account.overdraft_limit_updated",
            AccountEvent::AccountClosed(_) => "account.closed",
            AccountEvent::AccountReopened(_) => "account.reopened",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AccountEvent::AccountOpened(e) => e.occurred_at,
            AccountEvent::FundsDeposited(e) => e.occurred_at,
            AccountEvent::FundsWithdrawn(e) => e.occurred_at,
            AccountEvent::OverdraftLimitUpdated(e) => e.occurred_at,
            AccountEvent::AccountClosed(e) => e.occurred_at,
            AccountEvent::AccountReopened(e) => e.occurred_at,
        }
    }
}

impl Aggregate for CurrentAccount {
    type Command = AccountCommand;
    type Event = AccountEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            AccountEvent::AccountOpened(e) => {
                self.id = e.account_id;
                self.is_open = true;
                self.balance = Decimal::ZERO;
                self.overdraft = OverdraftLimit::ZERO;
            }
            AccountEvent::FundsDeposited(e) => {
                self.balance = e.balance;
            }
            AccountEvent::FundsWithdrawn(e) => {
                self.balance = e.balance;
            }
            AccountEvent::OverdraftLimitUpdated(e) => {
                self.overdraft = e.limit;
            }
            AccountEvent::AccountClosed(_) => {
                self.is_open = false;
            }
            AccountEvent::AccountReopened(_) => {
                self.is_open = true;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        self.ensure_account_id(command.target_account_id())?;

        match command {
            AccountCommand::DepositFunds(cmd) => self.handle_deposit(cmd),
            AccountCommand::WithdrawFunds(cmd) => self.handle_withdraw(cmd),
            AccountCommand::UpdateOverdraftLimit(cmd) => self.handle_update_overdraft(cmd),
            AccountCommand::Close(cmd) => self.handle_close(cmd),
            AccountCommand::ReOpen(cmd) => self.handle_reopen(cmd),
        }
    }
}

impl CurrentAccount {
    fn ensure_account_id(&self, account_id: AccountId) -> Result<(), DomainError> {
        if self.id != account_id {
            return Err(DomainError::invariant("account_id mismatch"));
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if !self.is_open {
            return Err(InvalidOperation::AccountClosed.into());
        }
        Ok(())
    }

    fn ensure_positive(amount: Decimal) -> Result<(), DomainError> {
        if amount <= Decimal::ZERO {
            return Err(InvalidOperation::NonPositiveAmount.into());
        }
        Ok(())
    }

    /// Whether `balance` is exactly the current balance shifted by `delta`.
    ///
    /// Decimal addition rounds once a result needs more than 28 digits.
    fn moved_by(&self, balance: Decimal, delta: Decimal) -> bool {
        balance.checked_sub(self.balance) == Some(delta)
    }

    fn handle_deposit(&self, cmd: &DepositFunds) -> Result<Vec<AccountEvent>, DomainError> {
        self.ensure_open()?;
        Self::ensure_positive(cmd.amount)?;

        let balance = self
            .balance
            .checked_add(cmd.amount)
            .filter(|balance| self.moved_by(*balance, cmd.amount))
            .ok_or_else(|| DomainError::overflow(format!("{} + {}", self.balance, cmd.amount)))?;

        Ok(vec![AccountEvent::FundsDeposited(FundsDeposited {
            account_id: cmd.account_id,
            amount: cmd.amount,
            balance,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_withdraw(&self, cmd: &WithdrawFunds) -> Result<Vec<AccountEvent>, DomainError> {
        self.ensure_open()?;
        Self::ensure_positive(cmd.amount)?;

        // Below -Decimal::MAX is below any floor.
        let balance = self
            .balance
            .checked_sub(cmd.amount)
            .ok_or(InvalidOperation::BelowOverdraft)?;
        if !self.moved_by(balance, -cmd.amount) {
            return Err(DomainError::overflow(format!(
                "{} - {} loses precision",
                self.balance, cmd.amount
            )));
        }
        if !self.overdraft.permits(balance) {
            return Err(InvalidOperation::BelowOverdraft.into());
        }

        Ok(vec![AccountEvent::FundsWithdrawn(FundsWithdrawn {
            account_id: cmd.account_id,
            amount: cmd.amount,
            balance,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_overdraft(
        &self,
        cmd: &UpdateOverdraftLimit,
    ) -> Result<Vec<AccountEvent>, DomainError> {
        self.ensure_open()?;

        let limit = OverdraftLimit::new(cmd.limit)?;
        if !limit.permits(self.balance) {
            return Err(InvalidOperation::OverdraftBelowBalance.into());
        }

        Ok(vec![AccountEvent::OverdraftLimitUpdated(OverdraftLimitUpdated {
            account_id: cmd.account_id,
            limit,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_close(&self, cmd: &CloseAccount) -> Result<Vec<AccountEvent>, DomainError> {
        if self.balance < Decimal::ZERO {
            return Err(InvalidOperation::NegativeBalanceOnClose.into());
        }

        Ok(vec![AccountEvent::AccountClosed(AccountClosed {
            account_id: cmd.account_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reopen(&self, cmd: &ReopenAccount) -> Result<Vec<AccountEvent>, DomainError> {
        if self.is_open {
            return Err(InvalidOperation::AlreadyOpen.into());
        }

        Ok(vec![AccountEvent::AccountReopened(AccountReopened {
            account_id: cmd.account_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
