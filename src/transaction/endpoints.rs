//! JSON route handlers for transactions.
//!
//! These are thin pass-throughs: deserialize, take the database lock, call
//! into [crate::transaction] core queries, serialize.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    month::MonthQuery,
    transaction::{
        NewTransaction, TransactionUpdate, create_transaction, delete_transaction,
        list_transactions, update_transaction,
    },
};

/// The state needed by the transaction route handlers.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl TransactionState {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// List transactions, newest first, optionally scoped to a month.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let month = if query.is_empty() {
        None
    } else {
        Some(query.resolve()?)
    };

    let connection = state.lock()?;
    let transactions = list_transactions(month, &connection)?;

    Ok(Json(transactions).into_response())
}

/// Create a transaction from a JSON body, responding with 201 and the
/// created record.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Json(new_transaction): Json<NewTransaction>,
) -> Result<Response, Error> {
    let connection = state.lock()?;
    let transaction = create_transaction(new_transaction, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)).into_response())
}

/// Apply a partial update to a transaction, responding with the updated
/// record.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Json(update): Json<TransactionUpdate>,
) -> Result<Response, Error> {
    let connection = state.lock()?;
    let transaction = update_transaction(transaction_id, update, &connection)?;

    Ok(Json(transaction).into_response())
}

/// Delete a transaction, responding with 204 on success.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state.lock()?;
    delete_transaction(transaction_id, &connection)?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
