//! Async collaborator interfaces the ledger is wired to.
//!
//! Storage is out of scope for this crate; these traits describe the contract
//! any backing store must provide. All calls may suspend while awaiting I/O.
//! Implementations live elsewhere (an in-memory store ships in `tally-store`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tally_shared::types::{AccountId, CategoryId, TransactionId, UserId};

use crate::budget::Budget;
use crate::ledger::types::{
    Account, Category, Transaction, TransactionFilter, TransactionUpdate, User,
};

/// Errors surfaced by a repository backend.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The storage backend failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Store of users; only existence matters to the ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetches a user by id.
    async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
}

/// Store of accounts with an atomic balance-increment primitive.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetches an account by id.
    async fn get(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;

    /// Adds the signed delta to the stored balance, atomically per account.
    ///
    /// Implementations must increment the stored value in place (a single
    /// atomic add-to-field operation), never read-modify-write the whole
    /// document, or concurrent transactions against the same account lose
    /// updates. Adjusting an unknown account is a backend error.
    async fn adjust_balance(&self, id: AccountId, delta: Decimal) -> Result<(), RepositoryError>;
}

/// Store of categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Fetches a category by id.
    async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError>;
}

/// Store of monthly budget limits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// Lists budgets for a (user, category, year, month) tuple.
    ///
    /// At most one budget is expected per tuple; callers consult only the
    /// first if the store returns several.
    async fn list_for_period(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        year: i32,
        month: u32,
    ) -> Result<Vec<Budget>, RepositoryError>;
}

/// Store of transactions, with the aggregate the budget guard needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Persists a new transaction.
    async fn insert(&self, transaction: Transaction) -> Result<(), RepositoryError>;

    /// Fetches a transaction by id.
    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, RepositoryError>;

    /// Lists transactions matching the filter, newest first.
    async fn list(&self, filter: TransactionFilter)
        -> Result<Vec<Transaction>, RepositoryError>;

    /// Applies a partial update with the given refreshed `updated_at`.
    ///
    /// Returns `None` if no matching document exists (e.g. a concurrent
    /// delete raced this update).
    async fn update(
        &self,
        id: TransactionId,
        update: TransactionUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Transaction>, RepositoryError>;

    /// Deletes a transaction; returns false if nothing was deleted.
    async fn delete(&self, id: TransactionId) -> Result<bool, RepositoryError>;

    /// Sums persisted **expense** amounts for the exact
    /// (user, category, year, month) tuple.
    async fn sum_for_category_period(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        year: i32,
        month: u32,
    ) -> Result<Decimal, RepositoryError>;
}
