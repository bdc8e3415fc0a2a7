use current_account_core::AccountId;

/// A command targets a specific account (command abstraction).
///
/// Commands represent **intent**, a request to perform an action on an
/// aggregate. They are transient and are either rejected with an error or
/// turned into events.
///
/// - **Command**: "withdraw 50"
/// - **Event**: `FundsWithdrawn { amount: 50 }`
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn target_account_id(&self) -> AccountId;
}
