//! Income and expense transactions recorded by users.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{CreateTransactionResponse, create_transaction_endpoint};
pub use db::{
    create_transaction, create_transaction_table, get_transaction, get_transactions,
    update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{NewTransaction, Transaction, TransactionId};
pub use edit::update_transaction_endpoint;
pub use form::{NumberOrString, TransactionForm};
pub use list::list_transactions_endpoint;
