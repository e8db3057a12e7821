//! Transactions: recorded income and expense events.
//!
//! `core` holds the models and database queries, `endpoints` the JSON route
//! handlers.

mod core;
mod endpoints;

pub use core::{
    NewTransaction, Transaction, TransactionKind, TransactionUpdate, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, list_transactions,
    map_transaction_row, update_transaction,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    update_transaction_endpoint,
};
