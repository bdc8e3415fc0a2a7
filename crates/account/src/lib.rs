//! Current account domain module (event-sourced).
//!
//! Business rules for a single checking account with an overdraft limit,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod account;
pub mod overdraft;
pub mod shared;

pub use account::{
    AccountClosed, AccountCommand, AccountEvent, AccountOpened, AccountReopened, CloseAccount,
    CurrentAccount, DepositFunds, FundsDeposited, FundsWithdrawn, OverdraftLimitUpdated,
    ReopenAccount, UpdateOverdraftLimit, WithdrawFunds,
};
pub use overdraft::OverdraftLimit;
pub use shared::{SharedAccount, SharedAccountError};
