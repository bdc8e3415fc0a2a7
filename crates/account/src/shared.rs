//! Thread-safe handle to one account.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use current_account_core::{DomainError, DomainResult};

use crate::account::{AccountCommand, AccountEvent, CurrentAccount};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedAccountError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A previous caller panicked while holding the account.
    #[error("account lock poisoned")]
    Poisoned,
}

/// One account behind a mutex.
///
/// Every operation holds the lock for the whole decide + apply step, so
/// validations cannot interleave. Clones share the same account.
#[derive(Debug, Clone)]
pub struct SharedAccount {
    inner: Arc<Mutex<CurrentAccount>>,
}

impl SharedAccount {
    pub fn new(account: CurrentAccount) -> Self {
        Self {
            inner: Arc::new(Mutex::new(account)),
        }
    }

    pub fn open() -> Self {
        Self::new(CurrentAccount::open())
    }

    /// Run `f` against the account while holding the lock.
    pub fn with<T>(
        &self,
        f: impl FnOnce(&mut CurrentAccount) -> DomainResult<T>,
    ) -> Result<T, SharedAccountError> {
        let mut account = self.inner.lock().map_err(|_| SharedAccountError::Poisoned)?;
        Ok(f(&mut account)?)
    }

    pub fn execute(
        &self,
        command: &AccountCommand,
    ) -> Result<Vec<AccountEvent>, SharedAccountError> {
        self.with(|account| account.execute(command))
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Result<CurrentAccount, SharedAccountError> {
        self.with(|account| Ok(account.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use current_account_core::{AggregateRoot, InvalidOperation};
    use rust_decimal::Decimal;
    use std::thread;

    #[test]
    fn concurrent_deposits_sum_exactly() {
        let shared = SharedAccount::open();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        shared
                            .with(|account| account.deposit_funds(Decimal::ONE))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let account = shared.snapshot().unwrap();
        assert_eq!(account.balance(), Decimal::from(800));
        assert_eq!(account.version(), 801);
    }

    #[test]
    fn concurrent_withdrawals_never_breach_the_overdraft() {
        let shared = SharedAccount::open();
        shared
            .with(|account| account.update_overdraft_limit(Decimal::from(50)))
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    (0..50)
                        .filter(|_| {
                            shared
                                .with(|account| account.withdraw_funds(Decimal::ONE))
                                .is_ok()
                        })
                        .count()
                })
            })
            .collect();
        let succeeded: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(succeeded, 50);
        assert_eq!(shared.snapshot().unwrap().balance(), Decimal::from(-50));
    }

    #[test]
    fn domain_errors_pass_through() {
        let shared = SharedAccount::open();

        let err = shared.with(|account| account.reopen()).unwrap_err();

        assert_eq!(
            err,
            SharedAccountError::Domain(InvalidOperation::AlreadyOpen.into())
        );
    }

    #[test]
    fn execute_applies_commands_under_the_lock() {
        let shared = SharedAccount::open();
        let account_id = shared.snapshot().unwrap().id_typed();
        let cmd = AccountCommand::DepositFunds(crate::DepositFunds {
            account_id,
            amount: Decimal::from(20),
            occurred_at: chrono::Utc::now(),
        });

        let events = shared.execute(&cmd).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(shared.snapshot().unwrap().balance(), Decimal::from(20));
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let shared = SharedAccount::open();
        let poisoner = shared.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(shared.snapshot().unwrap_err(), SharedAccountError::Poisoned);
    }
}
