//! Monthly per-category spending caps.

mod core;
mod endpoints;

pub use core::{
    Budget, BudgetUpdate, NewBudget, create_budget, create_budget_table, delete_budget,
    get_budget, list_budgets, map_budget_row, update_budget,
};
pub use endpoints::{
    create_budget_endpoint, delete_budget_endpoint, list_budgets_endpoint, update_budget_endpoint,
};
