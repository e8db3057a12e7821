//! The closed set of transaction categories and their display metadata.
//!
//! Categories are a fixed enum rather than free-form strings: each category
//! belongs to either the income or expense side and carries a human-readable
//! label and an icon class for clients to display.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, transaction::TransactionKind};

/// A spending or income category.
///
/// The wire and database representation is the category id, e.g.
/// "food" or "other-expense".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Food & Dining
    Food,
    /// Transport
    Transport,
    /// Entertainment
    Entertainment,
    /// Shopping
    Shopping,
    /// Bills & Utilities
    Bills,
    /// Healthcare
    Healthcare,
    /// Education
    Education,
    /// Travel
    Travel,
    /// Any other expense
    OtherExpense,
    /// Salary
    Salary,
    /// Freelance work
    Freelance,
    /// Business income
    Business,
    /// Investment returns
    Investment,
    /// Any other income
    OtherIncome,
}

/// All categories, expense categories first.
pub const ALL_CATEGORIES: [Category; 14] = [
    Category::Food,
    Category::Transport,
    Category::Entertainment,
    Category::Shopping,
    Category::Bills,
    Category::Healthcare,
    Category::Education,
    Category::Travel,
    Category::OtherExpense,
    Category::Salary,
    Category::Freelance,
    Category::Business,
    Category::Investment,
    Category::OtherIncome,
];

impl Category {
    /// Whether this category applies to income or expense transactions.
    pub fn kind(&self) -> TransactionKind {
        match self {
            Category::Food
            | Category::Transport
            | Category::Entertainment
            | Category::Shopping
            | Category::Bills
            | Category::Healthcare
            | Category::Education
            | Category::Travel
            | Category::OtherExpense => TransactionKind::Expense,
            Category::Salary
            | Category::Freelance
            | Category::Business
            | Category::Investment
            | Category::OtherIncome => TransactionKind::Income,
        }
    }

    /// The stable string id used on the wire and in the database.
    pub fn id(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Bills => "bills",
            Category::Healthcare => "healthcare",
            Category::Education => "education",
            Category::Travel => "travel",
            Category::OtherExpense => "other-expense",
            Category::Salary => "salary",
            Category::Freelance => "freelance",
            Category::Business => "business",
            Category::Investment => "investment",
            Category::OtherIncome => "other-income",
        }
    }

    /// The human-readable category name.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food & Dining",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills & Utilities",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Travel => "Travel",
            Category::OtherExpense => "Other",
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Business => "Business",
            Category::Investment => "Investment",
            Category::OtherIncome => "Other",
        }
    }

    /// The Font Awesome icon class clients use to display the category.
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Food => "fas fa-utensils",
            Category::Transport => "fas fa-bus",
            Category::Entertainment => "fas fa-gamepad",
            Category::Shopping => "fas fa-shopping-bag",
            Category::Bills => "fas fa-file-invoice-dollar",
            Category::Healthcare => "fas fa-heartbeat",
            Category::Education => "fas fa-graduation-cap",
            Category::Travel => "fas fa-plane",
            Category::OtherExpense => "fas fa-ellipsis-h",
            Category::Salary => "fas fa-briefcase",
            Category::Freelance => "fas fa-laptop",
            Category::Business => "fas fa-building",
            Category::Investment => "fas fa-chart-line",
            Category::OtherIncome => "fas fa-plus-circle",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_CATEGORIES
            .into_iter()
            .find(|category| category.id() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_owned()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{ALL_CATEGORIES, Category};
    use crate::{Error, transaction::TransactionKind};

    #[test]
    fn ids_round_trip_through_from_str() {
        for category in ALL_CATEGORIES {
            assert_eq!(Category::from_str(category.id()), Ok(category));
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert_eq!(
            Category::from_str("gadgets"),
            Err(Error::UnknownCategory("gadgets".to_owned()))
        );
    }

    #[test]
    fn expense_and_income_sides_are_disjoint() {
        let expense_count = ALL_CATEGORIES
            .iter()
            .filter(|category| category.kind() == TransactionKind::Expense)
            .count();

        assert_eq!(expense_count, 9);
        assert_eq!(ALL_CATEGORIES.len() - expense_count, 5);
    }

    #[test]
    fn serde_uses_the_category_id() {
        let json = serde_json::to_string(&Category::OtherExpense).unwrap();
        assert_eq!(json, "\"other-expense\"");

        let parsed: Category = serde_json::from_str("\"food\"").unwrap();
        assert_eq!(parsed, Category::Food);
    }
}
