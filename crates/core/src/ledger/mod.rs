//! Transaction ledger logic.
//!
//! This module implements the ledger engine:
//! - Domain entities and input types
//! - Ownership, category, and transfer validation
//! - The transaction lifecycle orchestrator
//! - Account balance mutation
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;


pub use balance::BalanceUpdater;
pub use error::LedgerError;
pub use service::TransactionLedger;
pub use types::{
    Account, Category, CategoryType, CreateTransactionInput, Transaction, TransactionFilter,
    TransactionType, TransactionUpdate, User,
};
