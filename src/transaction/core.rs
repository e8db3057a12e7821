//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    category::Category,
    database_id::TransactionId,
    money::{decimal_column, positive_amount},
    month::MonthYear,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction records money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionKind {
    /// The string stored in the database and sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction kind \"{other}\"")),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense or income, i.e. an event where money was either spent or
/// earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money spent or earned. Always positive; the kind
    /// carries the sign.
    pub amount: Decimal,
    /// The category the transaction belongs to.
    pub category: Category,
    /// An optional text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened.
    pub date: Date,
}

/// The data needed to create a new transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of money spent or earned. Must be positive.
    pub amount: Decimal,
    /// The category the transaction belongs to. Must match the kind.
    pub category: Category,
    /// An optional text description.
    #[serde(default)]
    pub description: Option<String>,
    /// When the transaction happened. Defaults to today (UTC).
    #[serde(default)]
    pub date: Option<Date>,
}

/// A partial update to an existing transaction.
///
/// Fields left as `None` keep their stored value. This makes the
/// description merge-only: an update can replace it but not clear it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    /// Replace the transaction kind.
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    /// Replace the amount. Must be positive.
    pub amount: Option<Decimal>,
    /// Replace the category.
    pub category: Option<Category>,
    /// Replace the description. A missing field keeps the stored
    /// description; there is no way to clear it.
    pub description: Option<String>,
    /// Replace the date.
    pub date: Option<Date>,
}

/// Check that a kind/amount/category combination is a valid transaction.
///
/// # Errors
///
/// Returns [Error::NonPositiveAmount] if `amount` is zero or negative, or
/// [Error::CategoryKindMismatch] if `category` belongs to the other side of
/// the ledger.
fn validate(kind: TransactionKind, amount: Decimal, category: Category) -> Result<(), Error> {
    positive_amount(amount)?;

    if category.kind() != kind {
        return Err(Error::CategoryKindMismatch { category, kind });
    }

    Ok(())
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// A missing date defaults to today (UTC).
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - or [Error::CategoryKindMismatch] if the category does not match the
///   transaction kind,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate(
        new_transaction.kind,
        new_transaction.amount,
        new_transaction.category,
    )?;

    let date = new_transaction
        .date
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (kind, amount, category, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, kind, amount, category, description, date",
        )?
        .query_row(
            (
                new_transaction.kind.as_str(),
                new_transaction.amount.to_string(),
                new_transaction.category.id(),
                new_transaction.description,
                date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, kind, amount, category, description, date
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// List transactions, newest first.
///
/// If `month` is given, only transactions dated within that month are
/// returned. Transactions on the same date are ordered by descending id, so
/// the most recently recorded comes first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_transactions(
    month: Option<MonthYear>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    match month {
        Some(month) => {
            let start = month.first_day();
            let end = month.next().first_day();

            connection
                .prepare(
                    "SELECT id, kind, amount, category, description, date
                     FROM \"transaction\"
                     WHERE date >= :start AND date < :end
                     ORDER BY date DESC, id DESC",
                )?
                .query_map(&[(":start", &start), (":end", &end)], map_transaction_row)?
                .map(|row| row.map_err(Error::from))
                .collect()
        }
        None => connection
            .prepare(
                "SELECT id, kind, amount, category, description, date
                 FROM \"transaction\"
                 ORDER BY date DESC, id DESC",
            )?
            .query_map([], map_transaction_row)?
            .map(|row| row.map_err(Error::from))
            .collect(),
    }
}

/// Apply a partial update to a transaction, preserving unspecified fields.
///
/// The merged record is re-validated before anything is written.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid
///   transaction,
/// - or [Error::NonPositiveAmount]/[Error::CategoryKindMismatch] if the
///   merged record is invalid,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let existing = get_transaction(id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingTransaction,
        error => error,
    })?;

    let merged = Transaction {
        id: existing.id,
        kind: update.kind.unwrap_or(existing.kind),
        amount: update.amount.unwrap_or(existing.amount),
        category: update.category.unwrap_or(existing.category),
        description: update.description.or(existing.description),
        date: update.date.unwrap_or(existing.date),
    };

    validate(merged.kind, merged.amount, merged.category)?;

    connection.execute(
        "UPDATE \"transaction\"
         SET kind = ?1, amount = ?2, category = ?3, description = ?4, date = ?5
         WHERE id = ?6",
        (
            merged.kind.as_str(),
            merged.amount.to_string(),
            merged.category.id(),
            &merged.description,
            merged.date,
            merged.id,
        ),
    )?;

    Ok(merged)
}

/// Delete a transaction by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid
///   transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        Err(Error::DeleteMissingTransaction)
    } else {
        Ok(())
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                amount TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT,
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Index used by the month-scoped list and analytics queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;

    let raw_kind: String = row.get(1)?;
    let kind = raw_kind.parse::<TransactionKind>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, error)),
        )
    })?;

    let amount = decimal_column(row, 2)?;

    let raw_category: String = row.get(3)?;
    let category = raw_category.parse::<Category>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                error.to_string(),
            )),
        )
    })?;

    let description = row.get(4)?;
    let date = row.get(5)?;

    Ok(Transaction {
        id,
        kind,
        amount,
        category,
        description,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        category::Category,
        db::initialize,
        month::MonthYear,
        transaction::{
            NewTransaction, TransactionKind, TransactionUpdate, create_transaction,
            delete_transaction, get_transaction, list_transactions, update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn expense(amount: rust_decimal::Decimal, day: time::Date) -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Expense,
            amount,
            category: Category::Food,
            description: None,
            date: Some(day),
        }
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            NewTransaction {
                kind: TransactionKind::Income,
                amount: dec!(1000),
                category: Category::Salary,
                description: Some("January pay".to_owned()),
                date: Some(date!(2025 - 01 - 15)),
            },
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.amount, dec!(1000));
        assert_eq!(transaction.kind, TransactionKind::Income);
        assert_eq!(transaction.category, Category::Salary);
        assert_eq!(transaction.date, date!(2025 - 01 - 15));
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn create_fails_on_non_positive_amount() {
        let conn = get_test_connection();

        let result = create_transaction(expense(dec!(0), date!(2025 - 01 - 01)), &conn);

        assert_eq!(result, Err(Error::NonPositiveAmount(dec!(0))));
    }

    #[test]
    fn create_fails_on_category_kind_mismatch() {
        let conn = get_test_connection();

        let result = create_transaction(
            NewTransaction {
                kind: TransactionKind::Income,
                amount: dec!(50),
                category: Category::Food,
                description: None,
                date: None,
            },
            &conn,
        );

        assert_eq!(
            result,
            Err(Error::CategoryKindMismatch {
                category: Category::Food,
                kind: TransactionKind::Income,
            })
        );
    }

    #[test]
    fn amounts_survive_the_round_trip_exactly() {
        let conn = get_test_connection();

        let created =
            create_transaction(expense(dec!(0.10), date!(2025 - 03 - 01)), &conn).unwrap();
        let fetched = get_transaction(created.id, &conn).unwrap();

        assert_eq!(fetched.amount, dec!(0.10));
    }

    #[test]
    fn list_orders_by_date_descending() {
        let conn = get_test_connection();
        let oldest =
            create_transaction(expense(dec!(1), date!(2025 - 01 - 01)), &conn).unwrap();
        let newest =
            create_transaction(expense(dec!(2), date!(2025 - 03 - 01)), &conn).unwrap();
        let middle =
            create_transaction(expense(dec!(3), date!(2025 - 02 - 01)), &conn).unwrap();

        let transactions = list_transactions(None, &conn).unwrap();

        assert_eq!(transactions, vec![newest, middle, oldest]);
    }

    #[test]
    fn list_scoped_to_month_excludes_other_months() {
        let conn = get_test_connection();
        let in_january =
            create_transaction(expense(dec!(1), date!(2025 - 01 - 31)), &conn).unwrap();
        create_transaction(expense(dec!(2), date!(2025 - 02 - 01)), &conn).unwrap();
        create_transaction(expense(dec!(3), date!(2024 - 01 - 15)), &conn).unwrap();

        let transactions =
            list_transactions(Some(MonthYear::new(1, 2025).unwrap()), &conn).unwrap();

        assert_eq!(transactions, vec![in_january]);
    }

    #[test]
    fn update_merges_into_existing_record() {
        let conn = get_test_connection();
        let transaction =
            create_transaction(expense(dec!(25), date!(2025 - 01 - 10)), &conn).unwrap();

        let updated = update_transaction(
            transaction.id,
            TransactionUpdate {
                amount: Some(dec!(30)),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(updated.amount, dec!(30));
        // Unspecified fields keep their stored values.
        assert_eq!(updated.category, transaction.category);
        assert_eq!(updated.date, transaction.date);
        assert_eq!(get_transaction(transaction.id, &conn), Ok(updated));
    }

    #[test]
    fn update_without_description_keeps_the_stored_one() {
        let conn = get_test_connection();
        let mut new_transaction = expense(dec!(25), date!(2025 - 01 - 10));
        new_transaction.description = Some("Groceries".to_owned());
        let transaction = create_transaction(new_transaction, &conn).unwrap();

        let updated = update_transaction(
            transaction.id,
            TransactionUpdate {
                amount: Some(dec!(30)),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        // Descriptions are merge-only: a missing field never clears one.
        assert_eq!(updated.description, Some("Groceries".to_owned()));
    }

    #[test]
    fn update_rejects_invalid_merged_record() {
        let conn = get_test_connection();
        let transaction =
            create_transaction(expense(dec!(25), date!(2025 - 01 - 10)), &conn).unwrap();

        // Flipping the kind without changing the category must fail.
        let result = update_transaction(
            transaction.id,
            TransactionUpdate {
                kind: Some(TransactionKind::Income),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(
            result,
            Err(Error::CategoryKindMismatch {
                category: Category::Food,
                kind: TransactionKind::Income,
            })
        );
        // No partial write happened.
        assert_eq!(get_transaction(transaction.id, &conn), Ok(transaction));
    }

    #[test]
    fn update_missing_transaction_fails() {
        let conn = get_test_connection();

        let result = update_transaction(42, TransactionUpdate::default(), &conn);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let transaction =
            create_transaction(expense(dec!(5), date!(2025 - 01 - 01)), &conn).unwrap();

        delete_transaction(transaction.id, &conn).unwrap();

        assert_eq!(
            get_transaction(transaction.id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_missing_transaction_fails() {
        let conn = get_test_connection();

        let result = delete_transaction(42, &conn);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }
}
