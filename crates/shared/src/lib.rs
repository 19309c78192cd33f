//! Shared types and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Monetary normalization with decimal precision
//! - Typed IDs for type-safe entity references
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
