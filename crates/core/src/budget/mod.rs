//! Monthly budget limits and the budget guard.

pub mod guard;
pub mod types;

pub use guard::BudgetGuard;
pub use types::{Budget, BudgetPeriod};
