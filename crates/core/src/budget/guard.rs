//! Budget-limit enforcement for expense transactions.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::types::BudgetPeriod;
use crate::ledger::error::LedgerError;
use crate::ledger::types::{Transaction, TransactionType};
use crate::repository::{BudgetRepository, TransactionRepository};

/// Guards expense transactions against their category's monthly budget.
pub struct BudgetGuard {
    budgets: Arc<dyn BudgetRepository>,
    transactions: Arc<dyn TransactionRepository>,
}

impl BudgetGuard {
    /// Creates a new budget guard over the given stores.
    #[must_use]
    pub fn new(
        budgets: Arc<dyn BudgetRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            budgets,
            transactions,
        }
    }

    /// Rejects the transaction if it would push its category's spend for the
    /// month over the configured budget.
    ///
    /// Only expense transactions are constrained; a category without a budget
    /// for the period is unconstrained. `exclude_amount` is the prior
    /// contribution of a transaction being amended, subtracted from the
    /// persisted total before the new amount is added, so an amendment is not
    /// double counted. A total exactly equal to the limit is allowed.
    ///
    /// Enforcement is best-effort: the total is read in a separate round trip
    /// from the later persistence, so two concurrent expenses can both pass
    /// the check and jointly exceed the limit.
    ///
    /// # Errors
    ///
    /// Returns `BudgetExceeded` with the category, period, limit, and
    /// attempted total when the limit would be exceeded, or a repository
    /// error if a store call fails.
    pub async fn ensure_budget_allows(
        &self,
        transaction: &Transaction,
        exclude_amount: Decimal,
    ) -> Result<(), LedgerError> {
        if transaction.transaction_type != TransactionType::Expense {
            return Ok(());
        }

        let period = BudgetPeriod::from_datetime(transaction.occurred_at);
        let budgets = self
            .budgets
            .list_for_period(
                transaction.user_id,
                transaction.category_id,
                period.year,
                period.month,
            )
            .await?;
        let Some(budget) = budgets.first() else {
            return Ok(());
        };

        let current_total = self
            .transactions
            .sum_for_category_period(
                transaction.user_id,
                transaction.category_id,
                period.year,
                period.month,
            )
            .await?;

        let adjusted_total = current_total - exclude_amount + transaction.amount;
        if adjusted_total > budget.amount {
            return Err(LedgerError::BudgetExceeded {
                category_id: transaction.category_id,
                year: period.year,
                month: period.month,
                limit: budget.amount,
                attempted: adjusted_total,
            });
        }

        tracing::debug!(
            category_id = %transaction.category_id,
            %period,
            limit = %budget.amount,
            total = %adjusted_total,
            "Budget check passed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tally_shared::types::{AccountId, BudgetId, CategoryId, TransactionId, UserId};

    use super::super::types::Budget;
    use crate::repository::{MockBudgetRepository, MockTransactionRepository};

    fn make_expense(amount: Decimal) -> Transaction {
        let occurred_at = Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap();
        Transaction {
            id: TransactionId::new(),
            user_id: UserId::new(),
            account_id: AccountId::new(),
            category_id: CategoryId::new(),
            amount,
            transaction_type: TransactionType::Expense,
            occurred_at,
            description: None,
            notes: None,
            counterparty: None,
            transfer_account_id: None,
            created_at: occurred_at,
            updated_at: occurred_at,
        }
    }

    fn budget_for(transaction: &Transaction, limit: Decimal) -> Budget {
        Budget {
            id: BudgetId::new(),
            user_id: transaction.user_id,
            category_id: transaction.category_id,
            year: 2026,
            month: 8,
            amount: limit,
        }
    }

    fn guard_with(
        budgets: Vec<Budget>,
        current_total: Decimal,
    ) -> BudgetGuard {
        let mut budget_repo = MockBudgetRepository::new();
        budget_repo
            .expect_list_for_period()
            .returning(move |_, _, _, _| Ok(budgets.clone()));

        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo
            .expect_sum_for_category_period()
            .returning(move |_, _, _, _| Ok(current_total));

        BudgetGuard::new(Arc::new(budget_repo), Arc::new(transaction_repo))
    }

    #[tokio::test]
    async fn test_total_equal_to_limit_is_allowed() {
        let transaction = make_expense(dec!(40.00));
        let guard = guard_with(
            vec![budget_for(&transaction, dec!(100.00))],
            dec!(60.00),
        );

        guard
            .ensure_budget_allows(&transaction, Decimal::ZERO)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_total_over_limit_is_rejected() {
        let transaction = make_expense(dec!(40.01));
        let guard = guard_with(
            vec![budget_for(&transaction, dec!(100.00))],
            dec!(60.00),
        );

        let result = guard
            .ensure_budget_allows(&transaction, Decimal::ZERO)
            .await;
        match result {
            Err(LedgerError::BudgetExceeded {
                category_id,
                year,
                month,
                limit,
                attempted,
            }) => {
                assert_eq!(category_id, transaction.category_id);
                assert_eq!((year, month), (2026, 8));
                assert_eq!(limit, dec!(100.00));
                assert_eq!(attempted, dec!(100.01));
            }
            other => panic!("expected BudgetExceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exclude_amount_replaces_prior_contribution() {
        // Amending a 60.00 expense to 90.00 with a 100.00 limit: the old
        // contribution is excluded, so 60 - 60 + 90 = 90 passes.
        let transaction = make_expense(dec!(90.00));
        let guard = guard_with(
            vec![budget_for(&transaction, dec!(100.00))],
            dec!(60.00),
        );

        guard
            .ensure_budget_allows(&transaction, dec!(60.00))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_no_budget_means_unconstrained() {
        let transaction = make_expense(dec!(1000000.00));
        let guard = guard_with(vec![], dec!(0.00));

        guard
            .ensure_budget_allows(&transaction, Decimal::ZERO)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_only_first_budget_is_consulted() {
        let transaction = make_expense(dec!(50.00));
        let loose = budget_for(&transaction, dec!(100.00));
        let strict = budget_for(&transaction, dec!(10.00));
        let guard = guard_with(vec![loose, strict], dec!(0.00));

        guard
            .ensure_budget_allows(&transaction, Decimal::ZERO)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_expense_skips_all_repository_calls() {
        let mut transaction = make_expense(dec!(50.00));
        transaction.transaction_type = TransactionType::Income;

        let mut budget_repo = MockBudgetRepository::new();
        budget_repo.expect_list_for_period().never();
        let mut transaction_repo = MockTransactionRepository::new();
        transaction_repo.expect_sum_for_category_period().never();

        let guard = BudgetGuard::new(Arc::new(budget_repo), Arc::new(transaction_repo));
        guard
            .ensure_budget_allows(&transaction, Decimal::ZERO)
            .await
            .unwrap();
    }
}
