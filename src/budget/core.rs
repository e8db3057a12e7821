//! Defines the core data models and database queries for monthly budgets.

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::Category,
    database_id::BudgetId,
    money::{decimal_column, positive_amount},
    month::MonthYear,
    transaction::TransactionKind,
};

// ============================================================================
// MODELS
// ============================================================================

/// A per-category spending cap for a given month and year.
///
/// Actual spend is never stored: it is recomputed from transactions on each
/// read (see [crate::analytics::budget_statuses]). At most one budget exists
/// per (category, month, year); the database enforces this with a UNIQUE
/// constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The expense category the cap applies to.
    pub category: Category,
    /// The spending cap. Always positive.
    pub budget_amount: Decimal,
    /// The 1-12 month number the cap applies to.
    pub month: u8,
    /// The year the cap applies to.
    pub year: i32,
}

/// The data needed to create a new budget.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    /// The expense category to cap.
    pub category: Category,
    /// The spending cap. Must be positive.
    pub budget_amount: Decimal,
    /// The 1-12 month number.
    pub month: u8,
    /// The year.
    pub year: i32,
}

/// A partial update to an existing budget.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    /// Replace the category.
    pub category: Option<Category>,
    /// Replace the spending cap. Must be positive.
    pub budget_amount: Option<Decimal>,
    /// Replace the month number.
    pub month: Option<u8>,
    /// Replace the year.
    pub year: Option<i32>,
}

/// Check that a category/amount/month combination is a valid budget.
fn validate(category: Category, budget_amount: Decimal, month: u8, year: i32) -> Result<(), Error> {
    if category.kind() != TransactionKind::Expense {
        return Err(Error::NonExpenseBudgetCategory(category));
    }

    positive_amount(budget_amount)?;
    MonthYear::new(month, year)?;

    Ok(())
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new budget in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NonExpenseBudgetCategory] if the category is an income
///   category,
/// - or [Error::NonPositiveAmount] if the cap is zero or negative,
/// - or [Error::InvalidMonth] if the month is outside 1-12,
/// - or [Error::DuplicateBudget] if a budget already exists for the same
///   (category, month, year),
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(new_budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    validate(
        new_budget.category,
        new_budget.budget_amount,
        new_budget.month,
        new_budget.year,
    )?;

    let budget = connection
        .prepare(
            "INSERT INTO budget (category, budget_amount, month, year)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, category, budget_amount, month, year",
        )?
        .query_row(
            (
                new_budget.category.id(),
                new_budget.budget_amount.to_string(),
                new_budget.month,
                new_budget.year,
            ),
            map_budget_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateBudget,
            error => error.into(),
        })?;

    Ok(budget)
}

/// Retrieve a budget from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    let budget = connection
        .prepare("SELECT id, category, budget_amount, month, year FROM budget WHERE id = :id")?
        .query_one(&[(":id", &id)], map_budget_row)?;

    Ok(budget)
}

/// List the budgets for a given month.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_budgets(month: MonthYear, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, category, budget_amount, month, year
             FROM budget
             WHERE month = :month AND year = :year
             ORDER BY category",
        )?
        .query_map(
            &[
                (":month", &(month.number() as i64)),
                (":year", &(month.year as i64)),
            ],
            map_budget_row,
        )?
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Apply a partial update to a budget, preserving unspecified fields.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingBudget] if `id` does not refer to a valid budget,
/// - or the validation errors listed on [create_budget] if the merged
///   record is invalid,
/// - or [Error::DuplicateBudget] if the merged (category, month, year)
///   collides with another budget,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_budget(
    id: BudgetId,
    update: BudgetUpdate,
    connection: &Connection,
) -> Result<Budget, Error> {
    let existing = get_budget(id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingBudget,
        error => error,
    })?;

    let merged = Budget {
        id: existing.id,
        category: update.category.unwrap_or(existing.category),
        budget_amount: update.budget_amount.unwrap_or(existing.budget_amount),
        month: update.month.unwrap_or(existing.month),
        year: update.year.unwrap_or(existing.year),
    };

    validate(merged.category, merged.budget_amount, merged.month, merged.year)?;

    connection.execute(
        "UPDATE budget SET category = ?1, budget_amount = ?2, month = ?3, year = ?4 WHERE id = ?5",
        (
            merged.category.id(),
            merged.budget_amount.to_string(),
            merged.month,
            merged.year,
            merged.id,
        ),
    )?;

    Ok(merged)
}

/// Delete a budget by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingBudget] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_budget(id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM budget WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        Err(Error::DeleteMissingBudget)
    } else {
        Ok(())
    }
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                budget_amount TEXT NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                UNIQUE(category, month, year)
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Budget.
pub fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let id = row.get(0)?;

    let raw_category: String = row.get(1)?;
    let category = raw_category.parse::<Category>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                error.to_string(),
            )),
        )
    })?;

    let budget_amount = decimal_column(row, 2)?;
    let month = row.get(3)?;
    let year = row.get(4)?;

    Ok(Budget {
        id,
        category,
        budget_amount,
        month,
        year,
    })
}

// ============================================================================
// TESTS
// ============================================================================
