//! Pure aggregation over transaction and budget records.
//!
//! Provides functions to compute monthly income/expense summaries, group
//! expenses by category, and compare budgets against actual spend. Every
//! function takes plain record slices and recomputes from scratch; there is
//! no incremental state.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::{
    budget::Budget,
    category::Category,
    month::MonthYear,
    transaction::{Transaction, TransactionKind},
};

/// Aggregate income/expense/balance figures for a reference month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// The all-time net cash position: income minus expenses over every
    /// transaction regardless of the reference month.
    pub total_balance: Decimal,
    /// Total income within the reference month.
    pub monthly_income: Decimal,
    /// Total expenses within the reference month.
    pub monthly_expenses: Decimal,
    /// `monthly_income - monthly_expenses`.
    pub monthly_balance: Decimal,
}

/// The total spent in one expense category over a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The expense category.
    pub category: Category,
    /// The summed expense amount for the month.
    pub amount: Decimal,
}

/// A budget compared against the actual spend in its month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    /// The budget being reported on.
    #[serde(flatten)]
    pub budget: Budget,
    /// Summed expense amounts in the budget's (category, month, year).
    pub actual_spent: Decimal,
    /// `budget_amount - actual_spent`. Negative when over budget.
    pub remaining: Decimal,
    /// `actual_spent / budget_amount * 100`, rounded to two decimal places.
    /// May exceed 100.
    pub percentage: Decimal,
    /// Whether the actual spend exceeds the cap.
    pub is_over_budget: bool,
}

/// Compute the summary figures for the given reference month.
///
/// An empty transaction set yields an all-zero summary.
pub fn summarize(transactions: &[Transaction], month: MonthYear) -> MonthlySummary {
    let mut total_balance = Decimal::ZERO;
    let mut monthly_income = Decimal::ZERO;
    let mut monthly_expenses = Decimal::ZERO;

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => total_balance += transaction.amount,
            TransactionKind::Expense => total_balance -= transaction.amount,
        }

        if month.contains(transaction.date) {
            match transaction.kind {
                TransactionKind::Income => monthly_income += transaction.amount,
                TransactionKind::Expense => monthly_expenses += transaction.amount,
            }
        }
    }

    MonthlySummary {
        total_balance,
        monthly_income,
        monthly_expenses,
        monthly_balance: monthly_income - monthly_expenses,
    }
}

/// Group the month's expenses by category and sum the amounts per category.
///
/// The result is sorted by amount descending. Categories with equal totals
/// are ordered lexicographically by category id, so the output is
/// deterministic regardless of grouping order.
pub fn expenses_by_category(transactions: &[Transaction], month: MonthYear) -> Vec<CategoryTotal> {
    let mut totals: HashMap<Category, Decimal> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense && month.contains(t.date))
    {
        *totals.entry(transaction.category).or_insert(Decimal::ZERO) += transaction.amount;
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal { category, amount })
        .collect();

    breakdown.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.id().cmp(b.category.id()))
    });

    breakdown
}

/// Compare each budget against the actual spend in its (category, month,
/// year).
///
/// `remaining + actual_spent == budget_amount` holds exactly for every
/// entry. The budget cap is constrained positive at the write boundary, so
/// the percentage division cannot hit a zero denominator.
pub fn budget_statuses(budgets: &[Budget], transactions: &[Transaction]) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|budget| {
            let actual_spent: Decimal = transactions
                .iter()
                .filter(|t| {
                    t.kind == TransactionKind::Expense
                        && t.category == budget.category
                        && u8::from(t.date.month()) == budget.month
                        && t.date.year() == budget.year
                })
                .map(|t| t.amount)
                .sum();

            BudgetStatus {
                actual_spent,
                remaining: budget.budget_amount - actual_spent,
                percentage: (actual_spent / budget.budget_amount * dec!(100)).round_dp(2),
                is_over_budget: actual_spent > budget.budget_amount,
                budget: budget.clone(),
            }
        })
        .collect()
}
