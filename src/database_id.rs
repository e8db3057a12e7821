//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a transaction record.
pub type TransactionId = i64;

/// The ID of a savings goal record.
pub type GoalId = i64;

/// The ID of a budget record.
pub type BudgetId = i64;
