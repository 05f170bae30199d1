//! The owner check shared by every resource that belongs to a user.

use rusqlite::Connection;

use crate::{Error, auth::UserID};

/// A resource stored in a table with `id` and `user_id` columns, where
/// `user_id` refers to the user that owns the row.
pub trait OwnedResource {
    /// The name of the table holding the resource.
    const TABLE: &'static str;
}

/// Check that the row `id` exists in `R`'s table and belongs to `user_id`.
///
/// Call this inside the same SQL transaction as the mutation that depends on
/// it, so the row cannot change hands or disappear in between.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such row or it belongs to another
/// user. The two cases are deliberately indistinguishable.
pub fn ensure_owned<R: OwnedResource>(
    id: i64,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1 AND user_id = ?2)",
        R::TABLE
    );
    let is_owned: bool = connection.query_row(&query, (id, user_id.as_i64()), |row| row.get(0))?;

    if is_owned {
        Ok(())
    } else {
        Err(Error::NotFound)
    }
}
