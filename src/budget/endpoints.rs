//! JSON route handlers for budgets.

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
    budget::{BudgetUpdate, NewBudget, create_budget, delete_budget, list_budgets, update_budget},
    database_id::BudgetId,
    month::MonthQuery,
};

/// The state needed by the budget route handlers.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The database connection for managing budgets.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl BudgetState {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// List the budgets for a month, defaulting to the current month.
pub async fn list_budgets_endpoint(
    State(state): State<BudgetState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let month = query.resolve()?;

    let connection = state.lock()?;
    let budgets = list_budgets(month, &connection)?;

    Ok(Json(budgets).into_response())
}

/// Create a budget from a JSON body, responding with 201 and the created
/// record.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    Json(new_budget): Json<NewBudget>,
) -> Result<Response, Error> {
    let connection = state.lock()?;
    let budget = create_budget(new_budget, &connection)?;

    Ok((StatusCode::CREATED, Json(budget)).into_response())
}

/// Apply a partial update to a budget, responding with the updated record.
pub async fn update_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<BudgetId>,
    Json(update): Json<BudgetUpdate>,
) -> Result<Response, Error> {
    let connection = state.lock()?;
    let budget = update_budget(budget_id, update, &connection)?;

    Ok(Json(budget).into_response())
}

/// Delete a budget, responding with 204 on success.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<BudgetId>,
) -> Result<Response, Error> {
    let connection = state.lock()?;
    delete_budget(budget_id, &connection)?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
