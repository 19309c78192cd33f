//! Ledger error types for validation and not-found conditions.
//!
//! Every failure carries enough context (ids, amounts, period) for the caller
//! to render a precise message. Nothing here is fatal to the process; all
//! failures are per-operation.

use rust_decimal::Decimal;
use thiserror::Error;
use tally_shared::types::{AccountId, CategoryId, TransactionId, UserId};

use super::types::{CategoryType, TransactionType};
use crate::repository::RepositoryError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Not-Found Errors ==========
    /// Referenced user does not exist.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Referenced source account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Referenced category does not exist.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Referenced transfer destination account does not exist.
    #[error("Transfer destination account not found: {0}")]
    TransferAccountNotFound(AccountId),

    /// Transaction does not exist, or a concurrent delete raced this operation.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    // ========== Ownership Errors ==========
    /// Account belongs to a different user.
    #[error("Account {account_id} does not belong to user {user_id}")]
    AccountNotOwned {
        /// The account.
        account_id: AccountId,
        /// The requesting user.
        user_id: UserId,
    },

    /// Category belongs to a different user.
    #[error("Category {category_id} does not belong to user {user_id}")]
    CategoryNotOwned {
        /// The category.
        category_id: CategoryId,
        /// The requesting user.
        user_id: UserId,
    },

    /// Transfer destination account belongs to a different user.
    #[error("Transfer destination account {account_id} does not belong to user {user_id}")]
    TransferAccountNotOwned {
        /// The destination account.
        account_id: AccountId,
        /// The requesting user.
        user_id: UserId,
    },

    // ========== Validation Errors ==========
    /// Transaction type and category type are incompatible.
    #[error("A {transaction_type} transaction cannot reference a {category_type} category")]
    CategoryTypeMismatch {
        /// The transaction's type.
        transaction_type: TransactionType,
        /// The category's type.
        category_type: CategoryType,
    },

    /// Transfer transaction without a destination account.
    #[error("Transfer transactions require a destination account")]
    MissingTransferAccount,

    /// Transfer destination equals the source account.
    #[error("Transfer destination must differ from the source account")]
    TransferToSameAccount(AccountId),

    /// Amount is zero or negative after normalization.
    #[error("Transaction amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Update payload sets no fields.
    #[error("Update payload must set at least one field")]
    EmptyUpdate,

    /// The transaction would push the category's monthly spend over its budget.
    #[error(
        "Budget exceeded for category {category_id} in {year}-{month:02}: \
         limit is {limit}, transaction would bring the total to {attempted}"
    )]
    BudgetExceeded {
        /// The constrained category.
        category_id: CategoryId,
        /// Budget year.
        year: i32,
        /// Budget month (1-12).
        month: u32,
        /// Configured budget limit.
        limit: Decimal,
        /// Total the category would reach with this transaction.
        attempted: Decimal,
    },

    // ========== Infrastructure Errors ==========
    /// Repository/storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::TransferAccountNotFound(_) => "TRANSFER_ACCOUNT_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::AccountNotOwned { .. } => "ACCOUNT_NOT_OWNED",
            Self::CategoryNotOwned { .. } => "CATEGORY_NOT_OWNED",
            Self::TransferAccountNotOwned { .. } => "TRANSFER_ACCOUNT_NOT_OWNED",
            Self::CategoryTypeMismatch { .. } => "CATEGORY_TYPE_MISMATCH",
            Self::MissingTransferAccount => "MISSING_TRANSFER_ACCOUNT",
            Self::TransferToSameAccount(_) => "TRANSFER_TO_SAME_ACCOUNT",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::EmptyUpdate => "EMPTY_UPDATE",
            Self::BudgetExceeded { .. } => "BUDGET_EXCEEDED",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 404 Not Found
            Self::UserNotFound(_)
            | Self::AccountNotFound(_)
            | Self::CategoryNotFound(_)
            | Self::TransferAccountNotFound(_)
            | Self::TransactionNotFound(_) => 404,

            // 400 Bad Request - validation errors
            Self::AccountNotOwned { .. }
            | Self::CategoryNotOwned { .. }
            | Self::TransferAccountNotOwned { .. }
            | Self::CategoryTypeMismatch { .. }
            | Self::MissingTransferAccount
            | Self::TransferToSameAccount(_)
            | Self::NonPositiveAmount(_)
            | Self::EmptyUpdate
            | Self::BudgetExceeded { .. } => 400,

            // 500 Internal Server Error
            Self::Repository(_) => 500,
        }
    }

    /// Returns true if this error is a missing-entity condition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.http_status_code() == 404
    }
}
