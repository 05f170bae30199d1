//! Database operations for transactions.
//!
//! Every query is scoped to the owning user.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId},
    ownership::ensure_owned,
    transaction::{NewTransaction, Transaction, TransactionId},
};

const SELECT_TRANSACTION: &str = "SELECT t.id, t.user_id, t.amount, t.type, t.description,
        t.transaction_date, t.category_id, t.created_at, c.name
    FROM transactions t
    LEFT JOIN categories c ON t.category_id = c.id";

/// Check that a transaction's category, if any, belongs to `user_id`.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] if the category does not exist or belongs
/// to another user.
pub fn check_category_reference(
    category_id: Option<CategoryId>,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(category_id) = category_id else {
        return Ok(());
    };

    ensure_owned::<Category>(category_id, user_id, connection).map_err(|error| match error {
        Error::NotFound => Error::InvalidCategory,
        error => error,
    })
}

/// Record a transaction for `user_id` and return its generated ID.
///
/// The category check and the insert happen in one SQL transaction, so the
/// category cannot be deleted in between.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] if the category does not belong to the
/// user, or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    user_id: UserID,
    new_transaction: &NewTransaction,
    created_at: OffsetDateTime,
    connection: &Connection,
) -> Result<TransactionId, Error> {
    let transaction = connection.unchecked_transaction()?;

    check_category_reference(new_transaction.category_id, user_id, &transaction)?;

    transaction.execute(
        "INSERT INTO transactions
            (user_id, amount, type, description, transaction_date, category_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            user_id.as_i64(),
            new_transaction.amount,
            new_transaction.transaction_type,
            &new_transaction.description,
            new_transaction.transaction_date,
            new_transaction.category_id,
            created_at,
        ),
    )?;

    let id = transaction.last_insert_rowid();

    transaction.commit()?;

    Ok(id)
}

/// Retrieve a single transaction owned by `user_id`.
pub fn get_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTION} WHERE t.id = :id AND t.user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &transaction_id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of a user's transactions, newest first.
///
/// Transactions are ordered by date, then by when they were recorded.
pub fn get_transactions(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_TRANSACTION} WHERE t.user_id = ?1
             ORDER BY t.transaction_date DESC, t.created_at DESC, t.id DESC"
        ))?
        .query_map([user_id.as_i64()], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the fields of one of the user's transactions.
///
/// The caller should run this in the same SQL transaction as its ownership
/// check.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] if the new category does not belong to the
/// user and [Error::NotFound] if no transaction was updated.
pub fn update_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    new_transaction: &NewTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    check_category_reference(new_transaction.category_id, user_id, connection)?;

    let rows_affected = connection.execute(
        "UPDATE transactions
         SET amount = ?1, type = ?2, description = ?3, transaction_date = ?4, category_id = ?5
         WHERE id = ?6 AND user_id = ?7",
        (
            new_transaction.amount,
            new_transaction.transaction_type,
            &new_transaction.description,
            new_transaction.transaction_date,
            new_transaction.category_id,
            transaction_id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete one of the user's transactions.
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction does not exist or belongs to
/// another user.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
        (transaction_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Initialize the transaction table and indexes.
///
/// There is no database constraint that a transaction's category belongs to
/// the same user, [check_category_reference] enforces that on every write.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            amount REAL NOT NULL CHECK (amount > 0),
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            description TEXT,
            transaction_date TEXT NOT NULL,
            category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_user_date
            ON transactions(user_id, transaction_date);
        CREATE INDEX IF NOT EXISTS idx_transactions_category_id ON transactions(category_id);",
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        amount: row.get(2)?,
        transaction_type: row.get(3)?,
        description: row.get(4)?,
        transaction_date: row.get(5)?,
        category_id: row.get(6)?,
        created_at: row.get(7)?,
        category_name: row.get(8)?,
    })
}
