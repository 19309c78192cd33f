//! Budget data types.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{BudgetId, CategoryId, UserId};

/// A monthly spending limit for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Constrained category.
    pub category_id: CategoryId,
    /// Budget year.
    pub year: i32,
    /// Budget month (1-12).
    pub month: u32,
    /// Positive spending limit for the period.
    pub amount: Decimal,
}

/// A calendar (year, month) period in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BudgetPeriod {
    /// Year.
    pub year: i32,
    /// Month (1-12).
    pub month: u32,
}

impl BudgetPeriod {
    /// Derives the period a timestamp falls into.
    #[must_use]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
