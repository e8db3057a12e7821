//! Defines the core data models and database queries for savings goals.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::GoalId,
    money::{decimal_column, non_negative_amount, positive_amount},
};

/// The icon used for goals created without an explicit icon.
pub const DEFAULT_GOAL_ICON: &str = "fas fa-bullseye";

// ============================================================================
// MODELS
// ============================================================================

/// A savings target with current progress, e.g. "Emergency fund, $5000 by
/// December".
///
/// Progress is tracked independently of transactions: updating
/// `current_amount` is a deliberate user action, not an automatic rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// The ID of the goal.
    pub id: GoalId,
    /// What the user is saving for.
    pub name: String,
    /// The amount the user wants to reach.
    pub target_amount: Decimal,
    /// The amount saved so far. May exceed the target (over-saving is
    /// permitted).
    pub current_amount: Decimal,
    /// When the user wants to reach the target.
    pub target_date: Date,
    /// The icon class clients use to display the goal.
    pub icon: String,
    /// When the goal was created.
    pub created_at: OffsetDateTime,
}

impl Goal {
    /// How far along the goal is, as a percentage of the target, rounded to
    /// two decimal places for display. Not clamped: an over-saved goal
    /// reports more than 100.
    ///
    /// The target amount is constrained positive at the write boundary, so
    /// the division cannot hit a zero denominator.
    pub fn progress_percent(&self) -> Decimal {
        (self.current_amount / self.target_amount * dec!(100)).round_dp(2)
    }

    /// [Goal::progress_percent] clamped to 100 for display.
    pub fn display_progress(&self) -> Decimal {
        self.progress_percent().min(dec!(100))
    }

    /// Whether the saved amount has reached the target.
    ///
    /// Compares the exact amounts, not the rounded percentage: a goal at
    /// 99.998% displays as 100 but is not completed.
    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}

/// A goal together with its derived progress fields, as returned by the
/// list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalWithProgress {
    /// The stored goal.
    #[serde(flatten)]
    pub goal: Goal,
    /// Progress towards the target as a percentage, clamped to 100.
    pub progress: Decimal,
    /// Whether the target has been reached.
    pub is_completed: bool,
}

impl From<Goal> for GoalWithProgress {
    fn from(goal: Goal) -> Self {
        let progress = goal.display_progress();
        let is_completed = goal.is_completed();

        Self {
            goal,
            progress,
            is_completed,
        }
    }
}

/// The data needed to create a new goal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    /// What the user is saving for. Must not be empty.
    pub name: String,
    /// The amount to reach. Must be positive.
    pub target_amount: Decimal,
    /// The amount already saved. Defaults to zero.
    #[serde(default)]
    pub current_amount: Option<Decimal>,
    /// When to reach the target. Defaults to today (UTC).
    #[serde(default)]
    pub target_date: Option<Date>,
    /// The display icon. Defaults to [DEFAULT_GOAL_ICON].
    #[serde(default)]
    pub icon: Option<String>,
}

/// A partial update to an existing goal.
///
/// Fields left as `None` keep their stored value. `current_amount` is the
/// common case: progress updates patch just that field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    /// Replace the name. Must not be empty.
    pub name: Option<String>,
    /// Replace the target amount. Must be positive.
    pub target_amount: Option<Decimal>,
    /// Replace the saved amount. Must not be negative.
    pub current_amount: Option<Decimal>,
    /// Replace the target date.
    pub target_date: Option<Date>,
    /// Replace the icon.
    pub icon: Option<String>,
}

fn validated_name(name: &str) -> Result<String, Error> {
    let name = name.trim();

    if name.is_empty() {
        Err(Error::EmptyGoalName)
    } else {
        Ok(name.to_owned())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new goal in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyGoalName] if the name is empty or whitespace,
/// - or [Error::NonPositiveAmount] if the target amount is zero or negative,
/// - or [Error::NegativeAmount] if the current amount is negative,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_goal(new_goal: NewGoal, connection: &Connection) -> Result<Goal, Error> {
    let name = validated_name(&new_goal.name)?;
    let target_amount = positive_amount(new_goal.target_amount)?;
    let current_amount = non_negative_amount(new_goal.current_amount.unwrap_or(Decimal::ZERO))?;

    let now = OffsetDateTime::now_utc();
    let target_date = new_goal.target_date.unwrap_or_else(|| now.date());
    let icon = new_goal
        .icon
        .unwrap_or_else(|| DEFAULT_GOAL_ICON.to_owned());

    let goal = connection
        .prepare(
            "INSERT INTO goal (name, target_amount, current_amount, target_date, icon, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, name, target_amount, current_amount, target_date, icon, created_at",
        )?
        .query_row(
            (
                name,
                target_amount.to_string(),
                current_amount.to_string(),
                target_date,
                icon,
                now,
            ),
            map_goal_row,
        )?;

    Ok(goal)
}

/// Retrieve a goal from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid goal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_goal(id: GoalId, connection: &Connection) -> Result<Goal, Error> {
    let goal = connection
        .prepare(
            "SELECT id, name, target_amount, current_amount, target_date, icon, created_at
             FROM goal WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_goal_row)?;

    Ok(goal)
}

/// List all goals, most recently created first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_goals(connection: &Connection) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(
            "SELECT id, name, target_amount, current_amount, target_date, icon, created_at
             FROM goal
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map([], map_goal_row)?
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Apply a partial update to a goal, preserving unspecified fields.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingGoal] if `id` does not refer to a valid goal,
/// - or the validation errors listed on [create_goal] if the merged record
///   is invalid,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_goal(
    id: GoalId,
    update: GoalUpdate,
    connection: &Connection,
) -> Result<Goal, Error> {
    let existing = get_goal(id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingGoal,
        error => error,
    })?;

    let merged = Goal {
        id: existing.id,
        name: match update.name {
            Some(name) => validated_name(&name)?,
            None => existing.name,
        },
        target_amount: positive_amount(update.target_amount.unwrap_or(existing.target_amount))?,
        current_amount: non_negative_amount(
            update.current_amount.unwrap_or(existing.current_amount),
        )?,
        target_date: update.target_date.unwrap_or(existing.target_date),
        icon: update.icon.unwrap_or(existing.icon),
        created_at: existing.created_at,
    };

    connection.execute(
        "UPDATE goal
         SET name = ?1, target_amount = ?2, current_amount = ?3, target_date = ?4, icon = ?5
         WHERE id = ?6",
        (
            &merged.name,
            merged.target_amount.to_string(),
            merged.current_amount.to_string(),
            merged.target_date,
            &merged.icon,
            merged.id,
        ),
    )?;

    Ok(merged)
}

/// Delete a goal by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingGoal] if `id` does not refer to a valid goal,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_goal(id: GoalId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM goal WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        Err(Error::DeleteMissingGoal)
    } else {
        Ok(())
    }
}

/// Create the goal table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                target_amount TEXT NOT NULL,
                current_amount TEXT NOT NULL,
                target_date TEXT NOT NULL,
                icon TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Goal.
pub fn map_goal_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    Ok(Goal {
        id: row.get(0)?,
        name: row.get(1)?,
        target_amount: decimal_column(row, 2)?,
        current_amount: decimal_column(row, 3)?,
        target_date: row.get(4)?,
        icon: row.get(5)?,
        created_at: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod progress_tests {
    use rust_decimal_macros::dec;
    use time::{OffsetDateTime, macros::date};

    use super::{DEFAULT_GOAL_ICON, Goal};

    fn goal(target: rust_decimal::Decimal, current: rust_decimal::Decimal) -> Goal {
        Goal {
            id: 1,
            name: "Emergency fund".to_owned(),
            target_amount: target,
            current_amount: current,
            target_date: date!(2025 - 12 - 31),
            icon: DEFAULT_GOAL_ICON.to_owned(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn reaching_the_target_completes_the_goal() {
        let goal = goal(dec!(500), dec!(500));

        assert_eq!(goal.progress_percent(), dec!(100));
        assert!(goal.is_completed());
    }

    #[test]
    fn partial_progress_is_a_percentage() {
        let goal = goal(dec!(500), dec!(125));

        assert_eq!(goal.progress_percent(), dec!(25));
        assert!(!goal.is_completed());
    }

    #[test]
    fn goal_just_below_target_is_not_completed() {
        let goal = goal(dec!(500), dec!(499.99));

        // 99.998% rounds up to 100 for display, but the target is not met.
        assert_eq!(goal.progress_percent(), dec!(100));
        assert!(!goal.is_completed());
    }

    #[test]
    fn over_saving_exceeds_100_but_display_is_clamped() {
        let goal = goal(dec!(500), dec!(600));

        assert_eq!(goal.progress_percent(), dec!(120));
        assert_eq!(goal.display_progress(), dec!(100));
        assert!(goal.is_completed());
    }
}
