//! Account balance mutation.
//!
//! The balance updater is the only component that touches account balances.
//! It resolves the direction of a signed delta from the transaction type and
//! delegates the actual mutation to the account repository's atomic
//! add-to-field primitive, so concurrent transactions on the same account
//! cannot lose updates.

use std::sync::Arc;

use rust_decimal::Decimal;
use tally_shared::types::money::normalize;

use super::error::LedgerError;
use super::types::{Transaction, TransactionType};
use crate::repository::AccountRepository;

/// Applies signed monetary deltas to one or two accounts per transaction.
pub struct BalanceUpdater {
    accounts: Arc<dyn AccountRepository>,
}

impl BalanceUpdater {
    /// Creates a new balance updater over the given account store.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Applies the delta to the account(s) affected by the transaction.
    ///
    /// The delta is normalized first; an exactly-zero delta is a no-op.
    /// Direction per type:
    /// - Income: source balance += delta
    /// - Expense: source balance -= delta
    /// - Transfer: source balance -= delta, destination balance += delta
    ///
    /// # Errors
    ///
    /// Returns `MissingTransferAccount` if a transfer transaction reaches
    /// this point without a destination (unreachable when the transaction
    /// was created through the ledger), or a repository error if the store
    /// fails.
    pub async fn apply_balance_delta(
        &self,
        transaction: &Transaction,
        delta: Decimal,
    ) -> Result<(), LedgerError> {
        let delta = normalize(delta);
        if delta.is_zero() {
            return Ok(());
        }

        match transaction.transaction_type {
            TransactionType::Income => {
                self.accounts
                    .adjust_balance(transaction.account_id, delta)
                    .await?;
            }
            TransactionType::Expense => {
                self.accounts
                    .adjust_balance(transaction.account_id, -delta)
                    .await?;
            }
            TransactionType::Transfer => {
                let destination = transaction
                    .transfer_account_id
                    .ok_or(LedgerError::MissingTransferAccount)?;
                self.accounts
                    .adjust_balance(transaction.account_id, -delta)
                    .await?;
                self.accounts.adjust_balance(destination, delta).await?;
            }
        }

        tracing::debug!(
            transaction_id = %transaction.id,
            transaction_type = %transaction.transaction_type,
            %delta,
            "Applied balance delta"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;
    use tally_shared::types::{AccountId, CategoryId, TransactionId, UserId};

    use crate::repository::MockAccountRepository;

    fn make_transaction(
        transaction_type: TransactionType,
        transfer_account_id: Option<AccountId>,
    ) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: TransactionId::new(),
            user_id: UserId::new(),
            account_id: AccountId::new(),
            category_id: CategoryId::new(),
            amount: dec!(50.00),
            transaction_type,
            occurred_at: now,
            description: None,
            notes: None,
            counterparty: None,
            transfer_account_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_income_adds_to_source() {
        let transaction = make_transaction(TransactionType::Income, None);

        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_adjust_balance()
            .with(eq(transaction.account_id), eq(dec!(50.00)))
            .once()
            .returning(|_, _| Ok(()));

        let updater = BalanceUpdater::new(Arc::new(accounts));
        updater
            .apply_balance_delta(&transaction, dec!(50.00))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_expense_subtracts_from_source() {
        let transaction = make_transaction(TransactionType::Expense, None);

        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_adjust_balance()
            .with(eq(transaction.account_id), eq(dec!(-50.00)))
            .once()
            .returning(|_, _| Ok(()));

        let updater = BalanceUpdater::new(Arc::new(accounts));
        updater
            .apply_balance_delta(&transaction, dec!(50.00))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_transfer_moves_between_accounts() {
        let destination = AccountId::new();
        let transaction = make_transaction(TransactionType::Transfer, Some(destination));

        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_adjust_balance()
            .with(eq(transaction.account_id), eq(dec!(-50.00)))
            .once()
            .returning(|_, _| Ok(()));
        accounts
            .expect_adjust_balance()
            .with(eq(destination), eq(dec!(50.00)))
            .once()
            .returning(|_, _| Ok(()));

        let updater = BalanceUpdater::new(Arc::new(accounts));
        updater
            .apply_balance_delta(&transaction, dec!(50.00))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_negative_delta_reverses_direction() {
        let transaction = make_transaction(TransactionType::Expense, None);

        let mut accounts = MockAccountRepository::new();
        // Reversing an expense gives the money back.
        accounts
            .expect_adjust_balance()
            .with(eq(transaction.account_id), eq(dec!(50.00)))
            .once()
            .returning(|_, _| Ok(()));

        let updater = BalanceUpdater::new(Arc::new(accounts));
        updater
            .apply_balance_delta(&transaction, dec!(-50.00))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_zero_delta_is_a_noop() {
        let transaction = make_transaction(TransactionType::Income, None);

        let mut accounts = MockAccountRepository::new();
        accounts.expect_adjust_balance().never();

        let updater = BalanceUpdater::new(Arc::new(accounts));
        updater
            .apply_balance_delta(&transaction, dec!(0))
            .await
            .unwrap();
        // A delta that rounds to zero is also a no-op.
        updater
            .apply_balance_delta(&transaction, dec!(0.004))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_transfer_without_destination_is_rejected() {
        let transaction = make_transaction(TransactionType::Transfer, None);

        let mut accounts = MockAccountRepository::new();
        accounts.expect_adjust_balance().never();

        let updater = BalanceUpdater::new(Arc::new(accounts));
        let result = updater.apply_balance_delta(&transaction, dec!(50.00)).await;
        assert!(matches!(result, Err(LedgerError::MissingTransferAccount)));
    }
}
