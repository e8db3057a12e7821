//! JSON route handlers for the analytics read models.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    analytics::{budget_statuses, expenses_by_category, summarize},
    budget::list_budgets,
    month::MonthQuery,
    transaction::list_transactions,
};

/// The state needed by the analytics route handlers.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading transactions and budgets.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl AnalyticsState {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// Report the monthly income/expense summary, defaulting to the current
/// month.
///
/// The total balance covers every transaction on record, so the full set is
/// loaded regardless of the reference month.
pub async fn get_summary_endpoint(
    State(state): State<AnalyticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let month = query.resolve()?;

    let connection = state.lock()?;
    let transactions = list_transactions(None, &connection)?;

    Ok(Json(summarize(&transactions, month)).into_response())
}

/// Report the month's expenses grouped by category, largest first.
pub async fn get_category_breakdown_endpoint(
    State(state): State<AnalyticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let month = query.resolve()?;

    let connection = state.lock()?;
    let transactions = list_transactions(Some(month), &connection)?;

    Ok(Json(expenses_by_category(&transactions, month)).into_response())
}

/// Report each of the month's budgets compared against its actual spend.
pub async fn get_budget_status_endpoint(
    State(state): State<AnalyticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let month = query.resolve()?;

    let connection = state.lock()?;
    let budgets = list_budgets(month, &connection)?;
    let transactions = list_transactions(Some(month), &connection)?;

    Ok(Json(budget_statuses(&budgets, &transactions)).into_response())
}

#[cfg(test)]
mod endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use time::macros::date;

    use crate::{
        analytics::{
            get_budget_status_endpoint, get_category_breakdown_endpoint, get_summary_endpoint,
        },
        budget::{NewBudget, create_budget},
        category::Category,
        endpoints, initialize_db,
        transaction::{NewTransaction, TransactionKind, create_transaction},
    };

    use super::AnalyticsState;

    fn get_test_server() -> (TestServer, Arc<Mutex<Connection>>) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize database");

        let db_connection = Arc::new(Mutex::new(connection));
        let state = AnalyticsState {
            db_connection: db_connection.clone(),
        };

        let app = Router::new()
            .route(endpoints::ANALYTICS_SUMMARY, get(get_summary_endpoint))
            .route(
                endpoints::ANALYTICS_CATEGORIES,
                get(get_category_breakdown_endpoint),
            )
            .route(endpoints::ANALYTICS_BUDGETS, get(get_budget_status_endpoint))
            .with_state(state);

        let server = TestServer::try_new(app).expect("Could not create test server.");

        (server, db_connection)
    }

    fn insert_transaction(
        connection: &Arc<Mutex<Connection>>,
        kind: TransactionKind,
        amount: Decimal,
        category: Category,
        date: time::Date,
    ) {
        create_transaction(
            NewTransaction {
                kind,
                amount,
                category,
                description: None,
                date: Some(date),
            },
            &connection.lock().unwrap(),
        )
        .expect("Could not insert test transaction");
    }

    #[tokio::test]
    async fn summary_reports_monthly_and_total_figures() {
        let (server, connection) = get_test_server();
        insert_transaction(
            &connection,
            TransactionKind::Income,
            dec!(1000),
            Category::Salary,
            date!(2025 - 01 - 05),
        );
        insert_transaction(
            &connection,
            TransactionKind::Expense,
            dec!(300),
            Category::Food,
            date!(2025 - 01 - 12),
        );

        let response = server
            .get(endpoints::ANALYTICS_SUMMARY)
            .add_query_param("month", 1)
            .add_query_param("year", 2025)
            .await;

        response.assert_status_ok();
        let summary: Value = response.json();
        assert_eq!(summary["monthlyIncome"], "1000");
        assert_eq!(summary["monthlyExpenses"], "300");
        assert_eq!(summary["monthlyBalance"], "700");
        assert_eq!(summary["totalBalance"], "700");
    }

    #[tokio::test]
    async fn category_breakdown_sorts_largest_first() {
        let (server, connection) = get_test_server();
        insert_transaction(
            &connection,
            TransactionKind::Expense,
            dec!(40),
            Category::Transport,
            date!(2025 - 01 - 03),
        );
        insert_transaction(
            &connection,
            TransactionKind::Expense,
            dec!(160),
            Category::Food,
            date!(2025 - 01 - 05),
        );

        let response = server
            .get(endpoints::ANALYTICS_CATEGORIES)
            .add_query_param("month", 1)
            .add_query_param("year", 2025)
            .await;

        response.assert_status_ok();
        let breakdown: Vec<Value> = response.json();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0]["category"], "food");
        assert_eq!(breakdown[0]["amount"], "160");
        assert_eq!(breakdown[1]["category"], "transport");
    }

    #[tokio::test]
    async fn budget_status_reports_overspend() {
        let (server, connection) = get_test_server();
        create_budget(
            NewBudget {
                category: Category::Food,
                budget_amount: dec!(200),
                month: 1,
                year: 2025,
            },
            &connection.lock().unwrap(),
        )
        .expect("Could not insert test budget");
        insert_transaction(
            &connection,
            TransactionKind::Expense,
            dec!(300),
            Category::Food,
            date!(2025 - 01 - 12),
        );

        let response = server
            .get(endpoints::ANALYTICS_BUDGETS)
            .add_query_param("month", 1)
            .add_query_param("year", 2025)
            .await;

        response.assert_status_ok();
        let statuses: Vec<Value> = response.json();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0]["actualSpent"], "300");
        assert_eq!(statuses[0]["remaining"], "-100");
        assert_eq!(statuses[0]["isOverBudget"], true);

        // The serialized decimal may carry a trailing fractional zero, so
        // compare numerically.
        let percentage: Decimal = statuses[0]["percentage"].as_str().unwrap().parse().unwrap();
        assert_eq!(percentage, dec!(150));
    }
}
