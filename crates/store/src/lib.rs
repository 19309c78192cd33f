//! In-memory repository backend for Tally.
//!
//! `MemoryStore` implements every collaborator interface the ledger needs
//! over concurrent maps. Balance adjustment mutates the stored account in
//! place under the map's per-key lock - the atomic add-to-field primitive
//! the contract requires - and never holds a lock across an await point.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tally_core::budget::{Budget, BudgetPeriod};
use tally_core::ledger::types::{
    Account, Category, Transaction, TransactionFilter, TransactionType, TransactionUpdate, User,
};
use tally_core::repository::{
    AccountRepository, BudgetRepository, CategoryRepository, RepositoryError,
    TransactionRepository, UserRepository,
};
use tally_shared::types::money::normalize;
use tally_shared::types::{AccountId, BudgetId, CategoryId, TransactionId, UserId};

/// An in-memory document store backing all five repository interfaces.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<UserId, User>,
    accounts: DashMap<AccountId, Account>,
    categories: DashMap<CategoryId, Category>,
    budgets: DashMap<BudgetId, Budget>,
    transactions: DashMap<TransactionId, Transaction>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a user.
    pub fn put_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Seeds an account.
    pub fn put_account(&self, account: Account) {
        self.accounts.insert(account.id, account);
    }

    /// Seeds a category.
    pub fn put_category(&self, category: Category) {
        self.categories.insert(category.id, category);
    }

    /// Seeds a budget.
    pub fn put_budget(&self, budget: Budget) {
        self.budgets.insert(budget.id, budget);
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.get(&id).map(|entry| entry.clone()))
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn get(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.get(&id).map(|entry| entry.clone()))
    }

    async fn adjust_balance(
        &self,
        id: AccountId,
        delta: Decimal,
    ) -> Result<(), RepositoryError> {
        // get_mut holds the shard lock for the duration of the mutation, so
        // the increment is atomic per account.
        let Some(mut account) = self.accounts.get_mut(&id) else {
            return Err(RepositoryError::Backend(format!(
                "account {id} does not exist"
            )));
        };
        account.balance = normalize(account.balance + delta);
        account.updated_at = Utc::now();
        tracing::trace!(account_id = %id, %delta, balance = %account.balance, "Adjusted balance");
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        Ok(self.categories.get(&id).map(|entry| entry.clone()))
    }
}

#[async_trait]
impl BudgetRepository for MemoryStore {
    async fn list_for_period(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        year: i32,
        month: u32,
    ) -> Result<Vec<Budget>, RepositoryError> {
        Ok(self
            .budgets
            .iter()
            .filter(|entry| {
                entry.user_id == user_id
                    && entry.category_id == category_id
                    && entry.year == year
                    && entry.month == month
            })
            .map(|entry| entry.clone())
            .collect())
    }
}

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn insert(&self, transaction: Transaction) -> Result<(), RepositoryError> {
        self.transactions.insert(transaction.id, transaction);
        Ok(())
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, RepositoryError> {
        Ok(self.transactions.get(&id).map(|entry| entry.clone()))
    }

    async fn list(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let mut matching: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|entry| filter.matches(entry))
            .map(|entry| entry.clone())
            .collect();
        matching.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(matching)
    }

    async fn update(
        &self,
        id: TransactionId,
        update: TransactionUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Transaction>, RepositoryError> {
        let Some(mut transaction) = self.transactions.get_mut(&id) else {
            return Ok(None);
        };
        let mut merged = update.apply_to(&transaction);
        merged.updated_at = updated_at;
        *transaction = merged.clone();
        Ok(Some(merged))
    }

    async fn delete(&self, id: TransactionId) -> Result<bool, RepositoryError> {
        Ok(self.transactions.remove(&id).is_some())
    }

    async fn sum_for_category_period(
        &self,
        user_id: UserId,
        category_id: CategoryId,
        year: i32,
        month: u32,
    ) -> Result<Decimal, RepositoryError> {
        let period = BudgetPeriod { year, month };
        Ok(self
            .transactions
            .iter()
            .filter(|entry| {
                entry.transaction_type == TransactionType::Expense
                    && entry.user_id == user_id
                    && entry.category_id == category_id
                    && BudgetPeriod::from_datetime(entry.occurred_at) == period
            })
            .map(|entry| entry.amount)
            .sum())
    }
}
