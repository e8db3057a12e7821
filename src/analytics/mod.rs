//! Read-only aggregation over the recorded transactions and budgets.

mod aggregation;
mod endpoints;

pub use aggregation::{
    BudgetStatus, CategoryTotal, MonthlySummary, budget_statuses, expenses_by_category, summarize,
};
pub use endpoints::{
    get_budget_status_endpoint, get_category_breakdown_endpoint, get_summary_endpoint,
};
