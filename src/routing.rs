//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    analytics::{
        get_budget_status_endpoint, get_category_breakdown_endpoint, get_summary_endpoint,
    },
    budget::{
        create_budget_endpoint, delete_budget_endpoint, list_budgets_endpoint,
        update_budget_endpoint,
    },
    endpoints,
    goal::{create_goal_endpoint, delete_goal_endpoint, list_goals_endpoint, update_goal_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(endpoints::TRANSACTION, put(update_transaction_endpoint))
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .route(endpoints::GOALS, get(list_goals_endpoint))
        .route(endpoints::GOALS, post(create_goal_endpoint))
        .route(endpoints::GOAL, put(update_goal_endpoint))
        .route(endpoints::GOAL, delete(delete_goal_endpoint))
        .route(endpoints::BUDGETS, get(list_budgets_endpoint))
        .route(endpoints::BUDGETS, post(create_budget_endpoint))
        .route(endpoints::BUDGET, put(update_budget_endpoint))
        .route(endpoints::BUDGET, delete(delete_budget_endpoint))
        .route(endpoints::ANALYTICS_SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::ANALYTICS_CATEGORIES,
            get(get_category_breakdown_endpoint),
        )
        .route(endpoints::ANALYTICS_BUDGETS, get(get_budget_status_endpoint))
        .with_state(state)
}
