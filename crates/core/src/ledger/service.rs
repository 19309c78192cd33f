//! Transaction lifecycle orchestration.
//!
//! The ledger validates ownership and category compatibility, consults the
//! budget guard, persists through the transaction repository, and applies
//! balance deltas. Within one operation the steps run strictly in order -
//! validation, budget check, persistence, balance mutation - and a failure at
//! any step prevents later steps from running, so no side effect ever
//! precedes a validation failure.

use std::sync::Arc;

use chrono::Utc;
use tally_shared::types::money::normalize;
use tally_shared::types::{TransactionId, UserId};
use tracing::info;

use super::balance::BalanceUpdater;
use super::error::LedgerError;
use super::types::{CreateTransactionInput, Transaction, TransactionFilter, TransactionUpdate};
use super::validation;
use crate::budget::{BudgetGuard, BudgetPeriod};
use crate::repository::{
    AccountRepository, BudgetRepository, CategoryRepository, TransactionRepository,
    UserRepository,
};

/// The transaction ledger engine.
pub struct TransactionLedger {
    users: Arc<dyn UserRepository>,
    accounts: Arc<dyn AccountRepository>,
    categories: Arc<dyn CategoryRepository>,
    transactions: Arc<dyn TransactionRepository>,
    budget_guard: BudgetGuard,
    balance: BalanceUpdater,
}

impl TransactionLedger {
    /// Wires a ledger to its collaborator stores.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        accounts: Arc<dyn AccountRepository>,
        categories: Arc<dyn CategoryRepository>,
        budgets: Arc<dyn BudgetRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        let budget_guard = BudgetGuard::new(budgets, Arc::clone(&transactions));
        let balance = BalanceUpdater::new(Arc::clone(&accounts));
        Self {
            users,
            accounts,
            categories,
            transactions,
            budget_guard,
            balance,
        }
    }

    /// Creates a transaction and applies its effect to account balances.
    ///
    /// Validation runs to completion before anything is persisted: user
    /// existence, source account existence and ownership, category existence,
    /// ownership and type compatibility, transfer destination rules, amount
    /// positivity, and the budget limit, in that order.
    ///
    /// # Errors
    ///
    /// Returns the first failing check's error; see [`LedgerError`].
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<Transaction, LedgerError> {
        self.users
            .get(input.user_id)
            .await?
            .ok_or(LedgerError::UserNotFound(input.user_id))?;

        let account = self
            .accounts
            .get(input.account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(input.account_id))?;
        validation::ensure_account_owned(&account, input.user_id)?;

        let category = self
            .categories
            .get(input.category_id)
            .await?
            .ok_or(LedgerError::CategoryNotFound(input.category_id))?;
        validation::ensure_category_owned(&category, input.user_id)?;
        validation::ensure_category_compatible(input.transaction_type, &category)?;

        let transfer_account_id = validation::validate_transfer_target(
            input.transaction_type,
            input.account_id,
            input.transfer_account_id,
        )?;
        if let Some(destination_id) = transfer_account_id {
            let destination = self
                .accounts
                .get(destination_id)
                .await?
                .ok_or(LedgerError::TransferAccountNotFound(destination_id))?;
            if destination.user_id != input.user_id {
                return Err(LedgerError::TransferAccountNotOwned {
                    account_id: destination_id,
                    user_id: input.user_id,
                });
            }
        }

        let amount = validation::normalize_positive_amount(input.amount)?;

        let now = Utc::now();
        let transaction = Transaction {
            id: TransactionId::new(),
            user_id: input.user_id,
            account_id: input.account_id,
            category_id: input.category_id,
            amount,
            transaction_type: input.transaction_type,
            occurred_at: input.occurred_at,
            description: input.description,
            notes: input.notes,
            counterparty: input.counterparty,
            transfer_account_id,
            created_at: now,
            updated_at: now,
        };

        // A brand-new transaction has no prior contribution to exclude.
        self.budget_guard
            .ensure_budget_allows(&transaction, rust_decimal::Decimal::ZERO)
            .await?;

        self.transactions.insert(transaction.clone()).await?;
        self.balance
            .apply_balance_delta(&transaction, transaction.amount)
            .await?;

        info!(
            transaction_id = %transaction.id,
            user_id = %transaction.user_id,
            transaction_type = %transaction.transaction_type,
            amount = %transaction.amount,
            "Created transaction"
        );
        Ok(transaction)
    }

    /// Fetches a single transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if it does not exist.
    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        self.transactions
            .get(id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    /// Lists transactions matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the store fails.
    pub async fn list_transactions(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.transactions.list(filter).await?)
    }

    /// Lists a user's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the store fails.
    pub async fn list_transactions_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.list_transactions(TransactionFilter {
            user_id: Some(user_id),
            ..TransactionFilter::default()
        })
        .await
    }

    /// Amends a transaction's amount, timestamp, or free-text fields.
    ///
    /// The type, accounts, and category are immutable post-creation; an
    /// amount change is settled against the accounts as a compensating delta
    /// using the existing (unchanged) type and accounts.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the transaction is absent (including
    /// when a concurrent delete races the persistence step), `EmptyUpdate`
    /// for a no-op payload, `NonPositiveAmount` or `BudgetExceeded` when the
    /// new state is invalid.
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        mut update: TransactionUpdate,
    ) -> Result<Transaction, LedgerError> {
        let existing = self
            .transactions
            .get(id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(id))?;

        if update.is_empty() {
            return Err(LedgerError::EmptyUpdate);
        }
        if let Some(amount) = update.amount {
            update.amount = Some(validation::normalize_positive_amount(amount)?);
        }

        // Prospective state, used for budget evaluation only.
        let prospective = update.apply_to(&existing);

        // When the amended transaction stays in the same budget bucket, its
        // old contribution is being replaced rather than added on top.
        let same_bucket = prospective.category_id == existing.category_id
            && BudgetPeriod::from_datetime(prospective.occurred_at)
                == BudgetPeriod::from_datetime(existing.occurred_at);
        let exclude_amount = if same_bucket {
            existing.amount
        } else {
            rust_decimal::Decimal::ZERO
        };

        self.budget_guard
            .ensure_budget_allows(&prospective, exclude_amount)
            .await?;

        let amount_delta = update
            .amount
            .map(|new_amount| normalize(new_amount - existing.amount));

        let updated = self
            .transactions
            .update(id, update, Utc::now())
            .await?
            .ok_or(LedgerError::TransactionNotFound(id))?;

        if let Some(delta) = amount_delta
            && !delta.is_zero()
        {
            // An update never re-targets accounts; settle against the
            // existing type and accounts.
            self.balance.apply_balance_delta(&existing, delta).await?;
        }

        info!(transaction_id = %id, "Updated transaction");
        Ok(updated)
    }

    /// Permanently removes a transaction, reversing its balance effect.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the transaction is absent or a
    /// concurrent delete already removed it.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<(), LedgerError> {
        let existing = self
            .transactions
            .get(id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(id))?;

        if !self.transactions.delete(id).await? {
            return Err(LedgerError::TransactionNotFound(id));
        }

        self.balance
            .apply_balance_delta(&existing, -existing.amount)
            .await?;

        info!(
            transaction_id = %id,
            amount = %existing.amount,
            "Deleted transaction and reversed its effect"
        );
        Ok(())
    }
}
