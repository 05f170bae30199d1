//! Database operations for categories.
//!
//! Every query is scoped to the owning user.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, CategoryName},
    transaction_type::TransactionType,
};

/// Create a category owned by `user_id` and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateCategory] if the user already has a category with
/// the same name and type.
pub fn create_category(
    user_id: UserID,
    name: CategoryName,
    category_type: TransactionType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO categories (user_id, name, type) VALUES (?1, ?2, ?3);",
        (user_id.as_i64(), name.as_ref(), category_type),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        user_id,
        name,
        category_type,
    })
}

/// Retrieve a single category owned by `user_id`.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, user_id, name, type FROM categories WHERE id = :id AND user_id = :user_id;")?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of a user's categories in the order they were created.
pub fn get_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, user_id, name, type FROM categories WHERE user_id = ?1 ORDER BY id ASC;")?
        .query_map([user_id.as_i64()], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Update a category's name and type.
///
/// # Errors
///
/// Returns [Error::NotFound] if the category does not exist or is owned by
/// another user, and [Error::DuplicateCategory] if the new name and type clash
/// with another of the user's categories.
pub fn update_category(
    category_id: CategoryId,
    user_id: UserID,
    name: CategoryName,
    category_type: TransactionType,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE categories SET name = ?1, type = ?2 WHERE id = ?3 AND user_id = ?4",
        (name.as_ref(), category_type, category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete a category, leaving the user's transactions that referred to it
/// uncategorized.
///
/// Both steps happen in one SQL transaction, so either the category is gone
/// and nothing refers to it or nothing changed.
///
/// # Errors
///
/// Returns [Error::NotFound] if the category does not exist or is owned by
/// another user.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    transaction.execute(
        "UPDATE transactions SET category_id = NULL WHERE category_id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    let rows_affected = transaction.execute(
        "DELETE FROM categories WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        // Dropping the transaction rolls back the update above.
        return Err(Error::NotFound);
    }

    transaction.commit()?;

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            UNIQUE(user_id, name, type)
        );

        CREATE INDEX IF NOT EXISTS idx_categories_user_id ON categories(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let raw_name: String = row.get(2)?;
    let category_type = row.get(3)?;

    Ok(Category {
        id,
        user_id,
        name: CategoryName::new_unchecked(&raw_name),
        category_type,
    })
}
