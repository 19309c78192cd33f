//! Ledger domain types.
//!
//! Entities are plain immutable value structs; normalization and validation
//! happen explicitly in the ledger before an entity is constructed, never
//! inside the types themselves.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, CategoryId, TransactionId, UserId};

/// Transaction type classification.
///
/// The sign of a transaction's effect on balances is derived entirely from
/// this type; amounts are always stored positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money flowing into the source account.
    Income,
    /// Money flowing out of the source account.
    Expense,
    /// Money moving from the source account to a destination account.
    Transfer,
}

impl TransactionType {
    /// Returns true if a transaction of this type may reference the given
    /// category. Income and expense transactions must match the category's
    /// type; transfers are exempt from the check.
    #[must_use]
    pub fn is_compatible_with(self, category_type: CategoryType) -> bool {
        match self {
            Self::Income => category_type == CategoryType::Income,
            Self::Expense => category_type == CategoryType::Expense,
            Self::Transfer => true,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}

/// Category type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Category for income transactions.
    Income,
    /// Category for expense transactions.
    Expense,
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A user, relevant to the ledger only as an ownership anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

/// A monetary account owned by a user.
///
/// The balance is mutated only through the balance updater, never assigned
/// directly by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning user.
    pub user_id: UserId,
    /// Account name.
    pub name: String,
    /// Current balance, normalized to 2 fractional digits.
    pub balance: Decimal,
    /// Informational floor; not enforced by the ledger.
    pub minimum_balance: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A transaction category owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Owning user.
    pub user_id: UserId,
    /// Category name.
    pub name: String,
    /// Whether this category classifies income or expenses.
    pub category_type: CategoryType,
}

/// A persisted monetary transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning user.
    pub user_id: UserId,
    /// Source account.
    pub account_id: AccountId,
    /// Category the transaction is recorded against.
    pub category_id: CategoryId,
    /// Positive amount, normalized to 2 fractional digits.
    pub amount: Decimal,
    /// Transaction type; determines the direction of the balance effect.
    pub transaction_type: TransactionType,
    /// When the transaction occurred.
    pub occurred_at: DateTime<Utc>,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Optional counterparty name.
    pub counterparty: Option<String>,
    /// Destination account; required and meaningful only for transfers.
    pub transfer_account_id: Option<AccountId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Owning user.
    pub user_id: UserId,
    /// Source account.
    pub account_id: AccountId,
    /// Category to record against.
    pub category_id: CategoryId,
    /// Amount (positive; normalized by the ledger before persistence).
    pub amount: Decimal,
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// When the transaction occurred.
    pub occurred_at: DateTime<Utc>,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Optional counterparty name.
    pub counterparty: Option<String>,
    /// Destination account for transfers.
    pub transfer_account_id: Option<AccountId>,
}

/// Partial amendment of a transaction.
///
/// Only the amount, timestamp, and free-text fields are mutable; the type,
/// accounts, and category of a transaction are fixed at creation. `None`
/// means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    /// New amount (positive; normalized by the ledger).
    pub amount: Option<Decimal>,
    /// New occurrence timestamp.
    pub occurred_at: Option<DateTime<Utc>>,
    /// New description.
    pub description: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New counterparty.
    pub counterparty: Option<String>,
}

impl TransactionUpdate {
    /// Returns true if no field is set. Empty updates are rejected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.occurred_at.is_none()
            && self.description.is_none()
            && self.notes.is_none()
            && self.counterparty.is_none()
    }

    /// Builds the prospective transaction: the existing one merged with this
    /// update. Used for validation only; the original is never mutated and
    /// the result is never persisted directly.
    #[must_use]
    pub fn apply_to(&self, existing: &Transaction) -> Transaction {
        let mut prospective = existing.clone();
        if let Some(amount) = self.amount {
            prospective.amount = amount;
        }
        if let Some(occurred_at) = self.occurred_at {
            prospective.occurred_at = occurred_at;
        }
        if let Some(description) = &self.description {
            prospective.description = Some(description.clone());
        }
        if let Some(notes) = &self.notes {
            prospective.notes = Some(notes.clone());
        }
        if let Some(counterparty) = &self.counterparty {
            prospective.counterparty = Some(counterparty.clone());
        }
        prospective
    }
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by owning user.
    pub user_id: Option<UserId>,
    /// Filter by source account.
    pub account_id: Option<AccountId>,
    /// Filter by category.
    pub category_id: Option<CategoryId>,
    /// Filter by transaction type.
    pub transaction_type: Option<TransactionType>,
    /// Filter by occurrence range start (inclusive).
    pub occurred_from: Option<DateTime<Utc>>,
    /// Filter by occurrence range end (inclusive).
    pub occurred_to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    /// Returns true if the transaction satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(user_id) = self.user_id
            && transaction.user_id != user_id
        {
            return false;
        }
        if let Some(account_id) = self.account_id
            && transaction.account_id != account_id
        {
            return false;
        }
        if let Some(category_id) = self.category_id
            && transaction.category_id != category_id
        {
            return false;
        }
        if let Some(transaction_type) = self.transaction_type
            && transaction.transaction_type != transaction_type
        {
            return false;
        }
        if let Some(from) = self.occurred_from
            && transaction.occurred_at < from
        {
            return false;
        }
        if let Some(to) = self.occurred_to
            && transaction.occurred_at > to
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_shared::types::EntityId;

    fn make_transaction() -> Transaction {
        let now = Utc::now();
        Transaction {
            id: TransactionId::new(),
            user_id: UserId::new(),
            account_id: AccountId::new(),
            category_id: CategoryId::new(),
            amount: dec!(10.00),
            transaction_type: TransactionType::Expense,
            occurred_at: now,
            description: Some("groceries".to_string()),
            notes: None,
            counterparty: None,
            transfer_account_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_category_compatibility() {
        assert!(TransactionType::Income.is_compatible_with(CategoryType::Income));
        assert!(!TransactionType::Income.is_compatible_with(CategoryType::Expense));
        assert!(TransactionType::Expense.is_compatible_with(CategoryType::Expense));
        assert!(!TransactionType::Expense.is_compatible_with(CategoryType::Income));
        assert!(TransactionType::Transfer.is_compatible_with(CategoryType::Income));
        assert!(TransactionType::Transfer.is_compatible_with(CategoryType::Expense));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(TransactionUpdate::default().is_empty());
        let update = TransactionUpdate {
            notes: Some("late fee".to_string()),
            ..TransactionUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_apply_to_merges_without_mutating_original() {
        let existing = make_transaction();
        let update = TransactionUpdate {
            amount: Some(dec!(25.00)),
            notes: Some("split with flatmate".to_string()),
            ..TransactionUpdate::default()
        };

        let prospective = update.apply_to(&existing);

        assert_eq!(prospective.amount, dec!(25.00));
        assert_eq!(prospective.notes.as_deref(), Some("split with flatmate"));
        // Unset fields are carried over unchanged.
        assert_eq!(prospective.description, existing.description);
        assert_eq!(prospective.occurred_at, existing.occurred_at);
        // The original is untouched.
        assert_eq!(existing.amount, dec!(10.00));
        assert_eq!(existing.notes, None);
    }

    #[test]
    fn test_filter_matches() {
        let transaction = make_transaction();

        assert!(TransactionFilter::default().matches(&transaction));
        assert!(
            TransactionFilter {
                user_id: Some(transaction.user_id),
                transaction_type: Some(TransactionType::Expense),
                ..TransactionFilter::default()
            }
            .matches(&transaction)
        );
        assert!(
            !TransactionFilter {
                user_id: Some(UserId::new()),
                ..TransactionFilter::default()
            }
            .matches(&transaction)
        );
        assert!(
            !TransactionFilter {
                transaction_type: Some(TransactionType::Income),
                ..TransactionFilter::default()
            }
            .matches(&transaction)
        );
    }

    #[test]
    fn test_filter_date_range_is_inclusive() {
        let transaction = make_transaction();
        let filter = TransactionFilter {
            occurred_from: Some(transaction.occurred_at),
            occurred_to: Some(transaction.occurred_at),
            ..TransactionFilter::default()
        };
        assert!(filter.matches(&transaction));
    }

    #[test]
    fn test_transaction_serde_id_shape() {
        let mut transaction = make_transaction();
        transaction.id =
            TransactionId(EntityId::from_bytes([0x50, 0x7f, 0x1f, 0x77, 0xbc, 0xf8, 0x6c, 0xd7, 0x99, 0x43, 0x90, 0x11]));
        let json = serde_json::to_value(&transaction).unwrap();
        assert_eq!(json["id"], "507f1f77bcf86cd799439011");
        assert_eq!(json["transaction_type"], "expense");
    }
}
