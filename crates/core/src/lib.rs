//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and the transaction ledger live here.
//!
//! # Modules
//!
//! - `ledger` - Transaction lifecycle, validation, and balance mutation
//! - `budget` - Monthly budget limits and the budget guard
//! - `repository` - Async collaborator interfaces the ledger is wired to

pub mod budget;
pub mod ledger;
pub mod repository;
