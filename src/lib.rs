//! Pocketledger is a personal finance tracker: record income and expense
//! transactions, set per-category monthly budgets, track savings goals, and
//! read aggregated analytics (summaries, category breakdowns, budget status).
//!
//! This library provides a JSON REST API backed by SQLite. All analytics are
//! recomputed from the full transaction set on every read; there is no
//! caching or incremental maintenance.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use tokio::signal;

pub mod analytics;
mod app_state;
pub mod budget;
pub mod category;
mod database_id;
mod db;
pub mod endpoints;
pub mod goal;
pub mod money;
pub mod month;
mod routing;
pub mod transaction;

pub use app_state::AppState;
pub use database_id::{BudgetId, DatabaseId, GoalId, TransactionId};
pub use db::initialize as initialize_db;
pub use routing::build_router;

use crate::{category::Category, transaction::TransactionKind};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An amount that must be strictly positive (transaction amounts, goal
    /// targets, budget caps) was zero or negative.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// An amount that must be zero or greater (goal progress) was negative.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// An empty string was used for a goal name.
    #[error("goal name cannot be empty")]
    EmptyGoalName,

    /// A month number outside 1-12 was given.
    #[error("{0} is not a valid month number (expected 1-12)")]
    InvalidMonth(u8),

    /// A category id that is not part of the closed category set.
    #[error("\"{0}\" is not a known category")]
    UnknownCategory(String),

    /// A transaction's category belongs to the opposite kind, e.g. an
    /// income transaction filed under an expense category.
    #[error("category \"{category}\" cannot be used for {kind} transactions")]
    CategoryKindMismatch {
        /// The category that was used.
        category: Category,
        /// The kind of the transaction being created or updated.
        kind: TransactionKind,
    },

    /// A budget was given an income category; spending caps only make sense
    /// for expense categories.
    #[error("budgets can only be set for expense categories, got \"{0}\"")]
    NonExpenseBudgetCategory(Category),

    /// A budget already exists for the requested (category, month, year).
    #[error("a budget for this category and month already exists")]
    DuplicateBudget,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a goal that does not exist
    #[error("tried to update a goal that is not in the database")]
    UpdateMissingGoal,

    /// Tried to delete a goal that does not exist
    #[error("tried to delete a goal that is not in the database")]
    DeleteMissingGoal,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("budget.") =>
            {
                Error::DuplicateBudget
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NonPositiveAmount(_)
            | Error::NegativeAmount(_)
            | Error::EmptyGoalName
            | Error::InvalidMonth(_)
            | Error::UnknownCategory(_)
            | Error::CategoryKindMismatch { .. }
            | Error::NonExpenseBudgetCategory(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateBudget => StatusCode::CONFLICT,
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingGoal
            | Error::DeleteMissingGoal
            | Error::UpdateMissingBudget
            | Error::DeleteMissingBudget => StatusCode::NOT_FOUND,
            Error::DatabaseLockError | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // Internal failures should not leak details to the client.
        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;
    use rust_decimal_macros::dec;

    use crate::Error;

    #[test]
    fn validation_errors_map_to_bad_request() {
        assert_eq!(
            Error::NonPositiveAmount(dec!(-1)).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InvalidMonth(13).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_records_map_to_not_found() {
        assert_eq!(Error::DeleteMissingGoal.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_budget_maps_to_conflict() {
        assert_eq!(Error::DuplicateBudget.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn unique_constraint_converts_to_duplicate_budget() {
        let sql_error = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::ConstraintViolation,
                extended_code: 2067,
            },
            Some("UNIQUE constraint failed: budget.category, budget.month, budget.year".to_owned()),
        );

        assert_eq!(Error::from(sql_error), Error::DuplicateBudget);
    }

    #[test]
    fn no_rows_converts_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
