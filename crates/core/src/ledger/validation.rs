//! Cross-entity validation for ledger operations.
//!
//! Pure functions invoked explicitly by the ledger before an entity is
//! constructed or persisted. Each failure maps to one specific error.

use rust_decimal::Decimal;
use tally_shared::types::{AccountId, UserId};
use tally_shared::types::money::normalize;

use super::error::LedgerError;
use super::types::{Account, Category, TransactionType};

/// Validates that the account belongs to the given user.
///
/// # Errors
///
/// Returns `AccountNotOwned` on an ownership mismatch.
pub fn ensure_account_owned(account: &Account, user_id: UserId) -> Result<(), LedgerError> {
    if account.user_id != user_id {
        return Err(LedgerError::AccountNotOwned {
            account_id: account.id,
            user_id,
        });
    }
    Ok(())
}

/// Validates that the category belongs to the given user.
///
/// # Errors
///
/// Returns `CategoryNotOwned` on an ownership mismatch.
pub fn ensure_category_owned(category: &Category, user_id: UserId) -> Result<(), LedgerError> {
    if category.user_id != user_id {
        return Err(LedgerError::CategoryNotOwned {
            category_id: category.id,
            user_id,
        });
    }
    Ok(())
}

/// Validates category/transaction-type compatibility.
///
/// Income transactions require income categories, expense transactions
/// require expense categories; transfers are exempt.
///
/// # Errors
///
/// Returns `CategoryTypeMismatch` when the types are incompatible.
pub fn ensure_category_compatible(
    transaction_type: TransactionType,
    category: &Category,
) -> Result<(), LedgerError> {
    if !transaction_type.is_compatible_with(category.category_type) {
        return Err(LedgerError::CategoryTypeMismatch {
            transaction_type,
            category_type: category.category_type,
        });
    }
    Ok(())
}

/// Validates the transfer destination for the given transaction type.
///
/// Returns the destination account id when the transaction is a transfer,
/// `None` otherwise (a destination supplied on a non-transfer is ignored,
/// matching the stored model where the field is only meaningful for
/// transfers).
///
/// # Errors
///
/// Returns `MissingTransferAccount` when a transfer has no destination and
/// `TransferToSameAccount` when the destination equals the source.
pub fn validate_transfer_target(
    transaction_type: TransactionType,
    account_id: AccountId,
    transfer_account_id: Option<AccountId>,
) -> Result<Option<AccountId>, LedgerError> {
    if transaction_type != TransactionType::Transfer {
        return Ok(None);
    }

    let destination = transfer_account_id.ok_or(LedgerError::MissingTransferAccount)?;
    if destination == account_id {
        return Err(LedgerError::TransferToSameAccount(destination));
    }
    Ok(Some(destination))
}

/// Normalizes an amount to 2 fractional digits and requires it to stay
/// strictly positive.
///
/// # Errors
///
/// Returns `NonPositiveAmount` if the normalized amount is zero or negative.
pub fn normalize_positive_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    let normalized = normalize(amount);
    if normalized <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount(normalized));
    }
    Ok(normalized)
}
