//! Aggregate queries over a user's transactions.
//!
//! The reports are recomputed from the transactions table on every call.

use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    dashboard::{CategorySpending, MonthlyTotal, MonthlyTrends, Summary},
    transaction_type::TransactionType,
};

/// Sum the user's income and expenses.
///
/// A user without transactions gets zero for every field.
pub fn get_summary(user_id: UserID, connection: &Connection) -> Result<Summary, Error> {
    let (total_income, total_expense): (f64, f64) = connection.query_row(
        "SELECT
            COALESCE(SUM(CASE WHEN type = 'income' THEN amount END), 0.0),
            COALESCE(SUM(CASE WHEN type = 'expense' THEN amount END), 0.0)
        FROM transactions
        WHERE user_id = ?1",
        [user_id.as_i64()],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    Ok(Summary {
        total_income,
        total_expense,
        net_balance: total_income - total_expense,
    })
}

/// Sum the user's income and expenses for each calendar month.
pub fn get_monthly_trends(user_id: UserID, connection: &Connection) -> Result<MonthlyTrends, Error> {
    Ok(MonthlyTrends {
        income_trends: get_monthly_totals(user_id, TransactionType::Income, connection)?,
        expense_trends: get_monthly_totals(user_id, TransactionType::Expense, connection)?,
    })
}

fn get_monthly_totals(
    user_id: UserID,
    transaction_type: TransactionType,
    connection: &Connection,
) -> Result<Vec<MonthlyTotal>, Error> {
    connection
        .prepare(
            "SELECT strftime('%Y-%m', transaction_date) AS month, SUM(amount)
            FROM transactions
            WHERE user_id = ?1 AND type = ?2
            GROUP BY month
            ORDER BY month ASC",
        )?
        .query_map((user_id.as_i64(), transaction_type), |row| {
            Ok(MonthlyTotal {
                month: row.get(0)?,
                total_amount: row.get(1)?,
            })
        })?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

/// Sum the user's expenses per category, largest total first.
///
/// Uncategorized expenses are left out.
pub fn get_category_spending(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<CategorySpending>, Error> {
    connection
        .prepare(
            "SELECT c.name AS category_name, SUM(t.amount) AS total_spent
            FROM transactions t
            JOIN categories c ON t.category_id = c.id
            WHERE t.user_id = ?1 AND t.type = 'expense'
            GROUP BY c.name
            ORDER BY total_spent DESC, category_name ASC",
        )?
        .query_map([user_id.as_i64()], |row| {
            Ok(CategorySpending {
                category_name: row.get(0)?,
                total_spent: row.get(1)?,
            })
        })?
        .map(|maybe_spending| maybe_spending.map_err(|error| error.into()))
        .collect()
}
